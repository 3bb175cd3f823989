//! End-to-end transcription of synthetic pages.
//!
//! Pages are drawn from filled rectangles. The test model has an 8x8 raw
//! grid, so every filled rectangle embeds to zeros and signs are told apart
//! by aspect ratio alone: squares are A1, half-width rectangles are G1.

use std::sync::Arc;

use hieroscan::controls::{HOR, TS, VER};
use hieroscan::hieroscan_core::{AnchorTable, CornerAnchors, Embedder, Prototype, Shape};
use hieroscan::{
    Direction, EvalSummary, FontInfo, Rect, RegionRow, TranscribeOptions, Transcriber,
    evaluate_regions,
};
use image::{GrayImage, Luma};

const A1: char = '\u{13000}';
const G1: char = '\u{1313F}';

// --- Helpers ---

fn prototype(sign: char, aspect: f64) -> Prototype {
    Prototype {
        sign,
        core: Shape {
            embedding: vec![0.0; 64],
            aspect,
        },
        full: None,
        parts: Vec::new(),
    }
}

fn font(anchors: AnchorTable) -> FontInfo {
    FontInfo::new(
        Embedder::raw(8),
        vec![prototype(A1, 1.0), prototype(G1, 0.5)],
        anchors,
    )
    .unwrap()
}

fn transcriber() -> Transcriber {
    Transcriber::new(Arc::new(font(AnchorTable::new())), TranscribeOptions::default())
}

fn page(width: u32, height: u32, boxes: &[(u32, u32, u32, u32)]) -> GrayImage {
    let mut page = GrayImage::from_pixel(width, height, Luma([255]));
    for &(x, y, w, h) in boxes {
        for px in x..x + w {
            for py in y..y + h {
                page.put_pixel(px, py, Luma([0]));
            }
        }
    }
    page
}

fn s(chars: &[char]) -> String {
    chars.iter().collect()
}

// --- Whole-image transcription ---

#[test]
fn two_by_two_grid_reads_as_two_columns() {
    let page = page(
        100,
        100,
        &[(10, 10, 20, 20), (40, 10, 20, 20), (10, 40, 20, 20), (40, 40, 20, 20)],
    );
    let result = transcriber().transcribe(&page, Some(Direction::Horizontal));
    assert_eq!(result.encoding, s(&[A1, VER, A1, A1, VER, A1]));
    assert_eq!(result.signs.len(), 4);
    assert_eq!(result.structures.len(), 2);
}

#[test]
fn vertical_reading_groups_rows() {
    let page = page(
        100,
        100,
        &[(10, 10, 20, 20), (40, 10, 10, 20), (10, 40, 20, 20), (40, 40, 10, 20)],
    );
    let result = transcriber().transcribe(&page, Some(Direction::Vertical));
    assert_eq!(result.encoding, s(&[A1, HOR, G1, A1, HOR, G1]));
}

#[test]
fn aspect_ratio_selects_the_sign() {
    let page = page(100, 40, &[(10, 10, 20, 20), (50, 10, 10, 20)]);
    let result = transcriber().transcribe(&page, None);
    assert_eq!(result.direction, Direction::Horizontal);
    assert_eq!(result.encoding, s(&[A1, G1]));
}

#[test]
fn empty_page_gives_empty_encoding() {
    let page = page(60, 60, &[]);
    let result = transcriber().transcribe(&page, None);
    assert_eq!(result.encoding, "");
    assert!(result.structures.is_empty());
}

#[test]
fn specks_below_minimum_area_are_ignored() {
    let page = page(100, 40, &[(10, 10, 20, 20), (60, 20, 2, 2)]);
    let result = transcriber().transcribe(&page, None);
    assert_eq!(result.signs.len(), 1);
    assert_eq!(result.encoding, s(&[A1]));
}

#[test]
fn small_sign_in_empty_corner_is_inserted() {
    // A reversed L leaves the top-left quarter of the box empty.
    let boxes = [(10, 40, 40, 10), (40, 10, 10, 30), (12, 12, 8, 8)];
    let page = page(60, 60, &boxes);
    let anchors: AnchorTable = [(A1, CornerAnchors::with_defaults())].into_iter().collect();
    let transcriber = Transcriber::new(Arc::new(font(anchors)), TranscribeOptions::default());

    let result = transcriber.transcribe(&page, Some(Direction::Horizontal));
    assert_eq!(result.encoding, s(&[A1, TS, A1]));
}

// --- Regions ---

#[test]
fn region_transcription_and_evaluation() {
    let page = page(200, 100, &[(10, 10, 20, 20), (40, 10, 10, 20), (110, 10, 20, 20)]);
    let rows = vec![
        RegionRow {
            rect: Rect::new(0, 0, 100, 40),
            encoding: s(&[A1, G1]),
        },
        RegionRow {
            rect: Rect::new(100, 0, 100, 40),
            encoding: s(&[G1]),
        },
    ];

    let records = evaluate_regions(&transcriber(), &page, &rows, "page").unwrap();
    assert_eq!(records[0].label, "page:0");
    assert!(records[0].is_exact());
    assert_eq!(records[1].predicted, s(&[A1]));

    let summary = EvalSummary::from_records(&records);
    assert_eq!(summary.regions, 2);
    assert_eq!(summary.exact, 1);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.hits, 2);
}

#[test]
fn evaluation_fails_on_region_outside_page() {
    let page = page(50, 50, &[]);
    let rows = vec![RegionRow {
        rect: Rect::new(40, 40, 20, 20),
        encoding: String::new(),
    }];
    assert!(evaluate_regions(&transcriber(), &page, &rows, "page").is_err());
}

#[test]
fn regrow_follows_signs_across_region_edge() {
    let page = page(100, 60, &[(40, 10, 20, 20)]);
    let region = Rect::new(0, 0, 50, 60);
    let t = transcriber();

    let clipped = t.transcribe_region(&page, region, None, false).unwrap();
    assert_eq!(clipped.encoding, s(&[G1]));

    let regrown = t.transcribe_region(&page, region, None, true).unwrap();
    assert_eq!(regrown.encoding, s(&[A1]));
    assert_eq!(regrown.placed_signs()[0].rect, Rect::new(40, 10, 20, 20));
}

// --- Model directory ---

#[test]
fn transcriber_from_model_dir() {
    let dir = tempfile::tempdir().unwrap();
    let zeros = serde_json::to_string(&vec![0.0; 64]).unwrap();
    let json = format!(
        r#"{{
            "grid_size": 8,
            "prototypes": [
                {{ "sign": 77824, "core": {{ "embedding": {zeros}, "aspect": 1.0 }} }},
                {{ "sign": 78143, "core": {{ "embedding": {zeros}, "aspect": 0.5 }} }}
            ],
            "anchors": [ {{ "sign": 77824, "corners": {{ "ts": {{}} }} }} ]
        }}"#
    );
    std::fs::write(dir.path().join("model.json"), json).unwrap();

    let t = Transcriber::from_model_dir(dir.path(), TranscribeOptions::default()).unwrap();
    assert_eq!(t.font().len(), 2);
    let page = page(100, 40, &[(10, 10, 10, 20), (30, 10, 20, 20)]);
    assert_eq!(t.transcribe(&page, None).encoding, s(&[G1, A1]));
}

#[test]
fn missing_model_dir_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Transcriber::from_model_dir(dir.path().join("nope"), TranscribeOptions::default()).is_err());
}

// --- Parallel ---

#[cfg(feature = "parallel")]
mod parallel_tests {
    use super::*;

    #[test]
    fn batch_matches_sequential() {
        let pages: Vec<GrayImage> = (0..6)
            .map(|i| page(100, 40, &[(10, 10, 20, 20), (40 + i, 10, 10, 20)]))
            .collect();
        let t = transcriber();
        let batch = t.transcribe_batch(&pages, None);
        let sequential: Vec<_> = pages.iter().map(|p| t.transcribe(p, None)).collect();
        assert_eq!(batch, sequential);
    }
}
