//! Argument handling shared by all subcommands.

mod common;

use common::cmd;
use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("segments"))
        .stdout(predicate::str::contains("transcribe"))
        .stdout(predicate::str::contains("locate"))
        .stdout(predicate::str::contains("eval"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("hieroscan "));
}

#[test]
fn no_subcommand_is_usage_error() {
    cmd().assert().failure().code(2);
}

#[test]
fn unknown_direction_is_rejected() {
    cmd()
        .args(["transcribe", "page.png", "--model", "m", "--direction", "diagonal"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn undecodable_image_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.png");
    std::fs::write(&path, b"not an image").unwrap();

    cmd()
        .args(["segments", path.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to open image"));
}
