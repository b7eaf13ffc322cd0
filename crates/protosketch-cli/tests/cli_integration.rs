use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to get the protosketch binary command.
fn protosketch() -> Command {
    Command::cargo_bin("protosketch").unwrap()
}

/// Writes `contents` to a fresh file and returns the directory and path.
fn sketch_file(contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("input.sketch");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn help_exits_zero() {
    protosketch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Translate sketch schema files"));
}

#[test]
fn version_exits_zero() {
    protosketch()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("protosketch"));
}

#[test]
fn missing_argument_is_usage_error() {
    protosketch().assert().failure().code(2);
}

#[test]
fn translates_to_stdout() {
    let (_dir, path) = sketch_file(
        "package example\nmsg MyMessage\n  foo str 1\n  bar []int 3\n",
    );
    protosketch()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::eq(
            "package example;\n\
             message MyMessage {\n\
             \x20\x20optional string foo = 1;\n\
             \x20\x20repeated int bar = 3;\n\
             }\n",
        ));
}

#[test]
fn empty_file_produces_empty_output() {
    let (_dir, path) = sketch_file("");
    protosketch()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::eq(""));
}

#[test]
fn malformed_input_exits_three_with_diagnostic() {
    let (_dir, path) = sketch_file("msg M\n  foo str\n");
    protosketch()
        .arg(&path)
        .assert()
        .failure()
        .code(3)
        .stdout(predicate::eq(""))
        .stderr(predicate::str::contains("tag number"));
}

#[test]
fn inconsistent_indentation_exits_three() {
    let (_dir, path) = sketch_file("msg M\n  a str 1\n    b str 2\n");
    protosketch()
        .arg(&path)
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("inconsistent indentation"));
}

#[test]
fn missing_file_exits_one() {
    protosketch()
        .arg("no/such/file.sketch")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("IO error"));
}
