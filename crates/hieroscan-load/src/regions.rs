//! Region files: one hieroglyphic region of a page per line.
//!
//! Each line holds `x y w h encoding`, separated by single spaces. The
//! encoding may be empty.

use std::fs;
use std::path::Path;

use hieroscan_core::Rect;

use crate::error::LoadError;

/// A region of a page and its transcription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRow {
    pub rect: Rect,
    pub encoding: String,
}

/// Parse the contents of a region file. Blank lines are skipped.
pub fn parse_regions(text: &str) -> Result<Vec<RegionRow>, LoadError> {
    let mut rows = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 || fields.len() > 5 {
            return Err(LoadError::region(
                line_no,
                format!("expected 4 numbers and an encoding, found {} fields", fields.len()),
            ));
        }
        let mut numbers = [0u32; 4];
        for (slot, field) in numbers.iter_mut().zip(&fields) {
            *slot = field
                .parse()
                .map_err(|_| LoadError::region(line_no, format!("not a number: {field}")))?;
        }
        let [x, y, w, h] = numbers;
        rows.push(RegionRow {
            rect: Rect::new(x, y, w, h),
            encoding: fields.get(4).map(|s| s.to_string()).unwrap_or_default(),
        });
    }
    Ok(rows)
}

pub fn read_regions(path: impl AsRef<Path>) -> Result<Vec<RegionRow>, LoadError> {
    parse_regions(&fs::read_to_string(path)?)
}

/// Render rows in region-file format.
pub fn format_regions(rows: &[RegionRow]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{} {} {} {} {}\n",
                row.rect.x, row.rect.y, row.rect.width, row.rect.height, row.encoding
            )
        })
        .collect()
}

pub fn write_regions(path: impl AsRef<Path>, rows: &[RegionRow]) -> Result<(), LoadError> {
    fs::write(path, format_regions(rows))?;
    Ok(())
}
