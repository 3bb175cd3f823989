use std::path::Path;

use hieroscan::{Direction, SignNames, Transcription};

use crate::cli::TextFormat;
use crate::shared::{load_image, load_names, load_transcriber, parse_region};

pub fn run(
    file: &Path,
    model: &Path,
    direction: Option<Direction>,
    names: Option<&Path>,
    format: &TextFormat,
    region: Option<&str>,
    regrow: bool,
) -> Result<(), i32> {
    let region = region
        .map(parse_region)
        .transpose()
        .map_err(|e| {
            eprintln!("Error: {e}");
            1
        })?;
    let names = names.map(load_names).transpose()?;
    let transcriber = load_transcriber(model)?;
    let image = load_image(file)?;

    let result = match region {
        Some(rect) => transcriber
            .transcribe_region(&image, rect, direction, regrow)
            .map_err(|e| {
                eprintln!("Error: {e}");
                1
            })?,
        None => transcriber.transcribe(&image, direction),
    };

    match format {
        TextFormat::Text => write_text(&result, names.as_ref()),
        TextFormat::Json => write_json(&result, names.as_ref()),
    }
}

fn direction_str(direction: Direction) -> &'static str {
    match direction {
        Direction::Horizontal => "h",
        Direction::Vertical => "v",
    }
}

fn write_text(result: &Transcription, names: Option<&SignNames>) -> Result<(), i32> {
    match names {
        Some(names) => println!("{}", names.describe(&result.encoding)),
        None => println!("{}", result.encoding),
    }
    Ok(())
}

fn write_json(result: &Transcription, names: Option<&SignNames>) -> Result<(), i32> {
    let signs: Vec<serde_json::Value> = result
        .placed_signs()
        .iter()
        .map(|p| {
            serde_json::json!({
                "sign": p.sign.to_string(),
                "code": format!("U+{:04X}", u32::from(p.sign)),
                "name": names.and_then(|n| n.name(p.sign)),
                "x": p.rect.x,
                "y": p.rect.y,
                "width": p.rect.width,
                "height": p.rect.height,
            })
        })
        .collect();
    let unresolved = result.signs.len() - signs.len();

    let output = serde_json::json!({
        "encoding": result.encoding,
        "names": names.map(|n| n.describe(&result.encoding)),
        "direction": direction_str(result.direction),
        "signs": signs,
        "unresolved": unresolved,
    });
    let json_str = serde_json::to_string(&output).map_err(|e| {
        eprintln!("Error: failed to serialize transcription: {e}");
        1
    })?;
    println!("{json_str}");
    Ok(())
}
