use std::path::Path;

use hieroscan::{Connectivity, Segment, SegmentOptions, segment_image};

use crate::cli::OutputFormat;
use crate::shared::load_image;

pub fn run(
    file: &Path,
    threshold: u8,
    strict: bool,
    min_area: Option<u64>,
    min_ink_density: Option<f64>,
    format: &OutputFormat,
) -> Result<(), i32> {
    let image = load_image(file)?;
    let options = SegmentOptions {
        threshold,
        connectivity: if strict {
            Connectivity::Four
        } else {
            Connectivity::Eight
        },
        min_area,
        min_ink_density,
    };
    let segments = segment_image(&image, &options);
    tracing::debug!(count = segments.len(), "segmented {}", file.display());

    match format {
        OutputFormat::Text => write_text(&segments, threshold),
        OutputFormat::Json => write_json(&segments, threshold),
        OutputFormat::Csv => write_csv(&segments, threshold),
    }
}

fn write_text(segments: &[Segment], threshold: u8) -> Result<(), i32> {
    println!("x\ty\twidth\theight\tink");
    for s in segments {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            s.x(),
            s.y(),
            s.width(),
            s.height(),
            s.ink_count(threshold)
        );
    }
    Ok(())
}

fn write_json(segments: &[Segment], threshold: u8) -> Result<(), i32> {
    let rows: Vec<serde_json::Value> = segments
        .iter()
        .map(|s| {
            serde_json::json!({
                "x": s.x(),
                "y": s.y(),
                "width": s.width(),
                "height": s.height(),
                "ink": s.ink_count(threshold),
            })
        })
        .collect();
    let json_str = serde_json::to_string(&rows).map_err(|e| {
        eprintln!("Error: failed to serialize segments: {e}");
        1
    })?;
    println!("{json_str}");
    Ok(())
}

fn write_csv(segments: &[Segment], threshold: u8) -> Result<(), i32> {
    println!("x,y,width,height,ink");
    for s in segments {
        println!(
            "{},{},{},{},{}",
            s.x(),
            s.y(),
            s.width(),
            s.height(),
            s.ink_count(threshold)
        );
    }
    Ok(())
}
