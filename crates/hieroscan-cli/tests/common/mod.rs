//! Fixtures shared by the CLI integration tests.
//!
//! The model uses a raw 8x8 grid, so filled rectangles all embed to zeros
//! and are told apart by aspect ratio: squares are A1, half-width
//! rectangles are G1.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use image::{GrayImage, Luma};

pub const A1: char = '\u{13000}';
pub const G1: char = '\u{1313F}';

pub fn cmd() -> Command {
    Command::cargo_bin("hieroscan").unwrap()
}

pub fn s(chars: &[char]) -> String {
    chars.iter().collect()
}

/// Draw filled `(x, y, w, h)` boxes on a white page and save it as PNG.
pub fn write_page(dir: &Path, name: &str, width: u32, height: u32, boxes: &[(u32, u32, u32, u32)]) -> PathBuf {
    let mut page = GrayImage::from_pixel(width, height, Luma([255]));
    for &(x, y, w, h) in boxes {
        for px in x..x + w {
            for py in y..y + h {
                page.put_pixel(px, py, Luma([0]));
            }
        }
    }
    let path = dir.join(name);
    page.save(&path).unwrap();
    path
}

/// Write a model directory with prototypes for A1 and G1.
pub fn write_model(dir: &Path) -> PathBuf {
    let model_dir = dir.join("model");
    std::fs::create_dir_all(&model_dir).unwrap();
    let zeros = vec![0.0; 64];
    let model = serde_json::json!({
        "grid_size": 8,
        "prototypes": [
            { "sign": u32::from(A1), "core": { "embedding": zeros, "aspect": 1.0 } },
            { "sign": u32::from(G1), "core": { "embedding": zeros, "aspect": 0.5 } },
        ],
        "anchors": [],
    });
    std::fs::write(model_dir.join("model.json"), model.to_string()).unwrap();
    model_dir
}

/// Write a sign/letter table: squares are signs, narrow shapes are letters.
pub fn write_locator(dir: &Path) -> PathBuf {
    let zeros = vec![0.0; 16];
    let locator = serde_json::json!({
        "grid_size": 4,
        "entries": [
            { "embedding": zeros, "aspect": 1.0, "is_sign": true },
            { "embedding": zeros, "aspect": 0.6, "is_sign": false },
        ],
    });
    let path = dir.join("locator.json");
    std::fs::write(&path, locator.to_string()).unwrap();
    path
}

pub fn write_names(dir: &Path) -> PathBuf {
    let names = serde_json::json!({ "A1": u32::from(A1), "G1": u32::from(G1) });
    let path = dir.join("unipoints.json");
    std::fs::write(&path, names.to_string()).unwrap();
    path
}
