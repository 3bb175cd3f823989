//! Integration tests for the `locate` subcommand.

mod common;

use common::{A1, cmd, write_locator, write_model, write_page};
use predicates::prelude::*;

/// A line of six narrow "letters" followed by two hieroglyph squares.
fn mixed_page(dir: &std::path::Path) -> std::path::PathBuf {
    let mut boxes: Vec<(u32, u32, u32, u32)> = [10, 20, 30, 40, 50, 80]
        .into_iter()
        .map(|x| (x, 10, 6, 10))
        .collect();
    boxes.push((100, 5, 25, 25));
    boxes.push((130, 8, 12, 12));
    write_page(dir, "page.png", 160, 40, &boxes)
}

#[test]
fn locate_prints_region_file() {
    let dir = tempfile::tempdir().unwrap();
    let page = mixed_page(dir.path());
    let locator = write_locator(dir.path());
    let model = write_model(dir.path());

    cmd()
        .args([
            "locate",
            page.to_str().unwrap(),
            "--locator",
            locator.to_str().unwrap(),
            "--model",
            model.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(format!("100 5 42 25 {A1}{A1}\n"));
}

#[test]
fn locate_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let page = mixed_page(dir.path());
    let locator = write_locator(dir.path());
    let model = write_model(dir.path());
    let output = dir.path().join("page.png.csv");

    cmd()
        .args([
            "locate",
            page.to_str().unwrap(),
            "--locator",
            locator.to_str().unwrap(),
            "--model",
            model.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout("");

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written, format!("100 5 42 25 {A1}{A1}\n"));
}

#[test]
fn locate_missing_locator() {
    let dir = tempfile::tempdir().unwrap();
    let page = mixed_page(dir.path());
    let model = write_model(dir.path());

    cmd()
        .args([
            "locate",
            page.to_str().unwrap(),
            "--locator",
            "/nonexistent/locator.json",
            "--model",
            model.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to load locator"));
}
