use std::path::Path;

use hieroscan::{EvalSummary, evaluate_regions, read_regions};

use crate::shared::{load_image, load_transcriber};

pub fn run(model: &Path, file: &Path, regions: &Path) -> Result<(), i32> {
    let transcriber = load_transcriber(model)?;
    let page = load_image(file)?;
    let rows = read_regions(regions).map_err(|e| {
        eprintln!("Error: failed to read {}: {e}", regions.display());
        1
    })?;

    let label = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let records = evaluate_regions(&transcriber, &page, &rows, &label).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    println!("region\thits\ttotal\ttruth\tpredicted");
    for record in &records {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            record.label,
            record.hits(),
            record.total(),
            record.truth,
            record.predicted
        );
    }

    let summary = EvalSummary::from_records(&records);
    match summary.accuracy() {
        Some(accuracy) => println!(
            "total\t{}\t{}\t{} of {} regions exact\taccuracy {:.4}",
            summary.hits, summary.total, summary.exact, summary.regions, accuracy
        ),
        None => println!(
            "total\t0\t0\t{} of {} regions exact\taccuracy n/a",
            summary.exact, summary.regions
        ),
    }
    Ok(())
}
