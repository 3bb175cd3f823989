use std::path::Path;

use hieroscan::hieroscan_load::format_regions;
use hieroscan::{LocateOptions, RegionRow, locate_regions, write_regions};

use crate::shared::{load_image, load_locator, load_transcriber};

pub fn run(file: &Path, locator: &Path, model: &Path, output: Option<&Path>) -> Result<(), i32> {
    let locator = load_locator(locator)?;
    let transcriber = load_transcriber(model)?;
    let page = load_image(file)?;

    let rects = locate_regions(&page, &locator, &LocateOptions::default());
    tracing::debug!(regions = rects.len(), "located regions in {}", file.display());

    let mut rows = Vec::with_capacity(rects.len());
    for rect in rects {
        let result = transcriber
            .transcribe_region(&page, rect, None, false)
            .map_err(|e| {
                eprintln!("Error: {e}");
                1
            })?;
        rows.push(RegionRow {
            rect,
            encoding: result.encoding,
        });
    }

    match output {
        Some(path) => write_regions(path, &rows).map_err(|e| {
            eprintln!("Error: failed to write {}: {e}", path.display());
            1
        }),
        None => {
            print!("{}", format_regions(&rows));
            Ok(())
        }
    }
}
