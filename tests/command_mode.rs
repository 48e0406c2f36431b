//! Integration tests for the command-line front end

use pretty_assertions::assert_eq;
use sheetopia_core::storage::load_file;
use sheetopia_core::{CellPos, Value};
use std::path::Path;
use std::process::Command;

fn run_command(args: &[&str]) -> (String, String, i32) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    // Tests must be deterministic and not depend on a user's config.toml.
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "rows = 5\ncols = 4\n").expect("Failed to write config");

    let output = Command::new(env!("CARGO_BIN_EXE_sheetopia"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn write_snapshot(dir: &Path, json: &str) -> String {
    let path = dir.join("sheet.json");
    std::fs::write(&path, json).expect("Failed to write snapshot");
    path.to_string_lossy().to_string()
}

const SAMPLE: &str = r#"{
  "cells": {
    "0,0": { "value": 2 },
    "0,1": { "value": 3 },
    "0,2": { "value": null, "formula": "=A1+B1" },
    "1,0": { "value": "  padded  " }
  },
  "numRows": 3,
  "numCols": 3
}"#;

#[test]
fn test_basic_arithmetic() {
    let (stdout, _, code) = run_command(&["-c", "5 + 3"]);
    assert_eq!(stdout.trim(), "8");
    assert_eq!(code, 0);
}

#[test]
fn test_arithmetic_precedence_and_parens() {
    let (stdout, _, code) = run_command(&["-c", "=(1 + 2) * 3 - 4 / 8"]);
    assert_eq!(stdout.trim(), "8.5");
    assert_eq!(code, 0);
}

#[test]
fn test_formula_against_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_snapshot(dir.path(), SAMPLE);
    let (stdout, _, code) = run_command(&[&file, "-c", "=SUM(A1:C1)", "--at", "C3"]);
    // C1 is recalculated to 5 before the command runs.
    assert_eq!(stdout.trim(), "10");
    assert_eq!(code, 0);
}

#[test]
fn test_text_function() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_snapshot(dir.path(), SAMPLE);
    let (stdout, _, code) = run_command(&[&file, "-c", "=trim(A2)"]);
    assert_eq!(stdout.trim_end_matches('\n'), "padded");
    assert_eq!(code, 0);
}

#[test]
fn test_unknown_function_is_a_value() {
    let (stdout, _, code) = run_command(&["-c", "=FOO(A1)"]);
    assert_eq!(stdout.trim(), "Error: Unknown function FOO");
    assert_eq!(code, 0);
}

#[test]
fn test_set_cells_then_evaluate() {
    let (stdout, _, code) = run_command(&[
        "--set", "A1=4", "--set", "A2=6", "--set", "B1=x", "-c", "=AVERAGE(A1:B2)",
    ]);
    assert_eq!(stdout.trim(), "5");
    assert_eq!(code, 0);
}

#[test]
fn test_markdown_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_snapshot(dir.path(), SAMPLE);
    let (stdout, _, code) = run_command(&[&file]);
    assert_eq!(
        stdout,
        "# Sheet\n\n|   | A | B | C |\n|---|---|---|---|\n| 1 | 2 | 3 | 5 |\n| 2 |   padded   |  |  |\n"
    );
    assert_eq!(code, 0);
}

#[test]
fn test_structural_edit_and_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_snapshot(dir.path(), SAMPLE);
    let out = dir.path().join("out.json");
    let out_str = out.to_string_lossy().to_string();
    let (stdout, _, code) = run_command(&[&file, "--insert-row", "1", "--delete-col", "A", "-o", &out_str]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Exported to"));

    let doc = load_file(&out).unwrap();
    assert_eq!((doc.num_rows(), doc.num_cols()), (4, 2));
    // B1 moved to A2 and the formula from C1 to B2 with its text intact, so
    // it now reads the empty A1/B1.
    assert_eq!(doc.value(CellPos::new(1, 0)), Value::Number(3.0));
    let moved = doc.get_cell(CellPos::new(1, 1));
    assert_eq!(moved.formula.as_deref(), Some("=A1+B1"));
    assert_eq!(moved.value, Value::Number(0.0));
}

#[test]
fn test_markdown_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("sheet.md");
    let out_str = out.to_string_lossy().to_string();
    let (_, _, code) = run_command(&["--set", "B2=hello", "-o", &out_str]);
    assert_eq!(code, 0);
    let content = std::fs::read_to_string(&out).unwrap();
    assert!(content.starts_with("# Sheet\n"));
    assert!(content.contains("| 2 | hello |"));
}

#[test]
fn test_delete_last_row_fails() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_snapshot(dir.path(), r#"{"cells":{},"numRows":1,"numCols":1}"#);
    let (_, stderr, code) = run_command(&[&file, "--delete-row", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("Cannot delete the last row"));
}

#[test]
fn test_out_of_range_insert_fails() {
    // The config makes a 5-row sheet; row 7 would leave a gap.
    let (_, stderr, code) = run_command(&["--insert-row", "7"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("row index 6 is outside 0..5"));
}

#[test]
fn test_unknown_option() {
    let (_, stderr, code) = run_command(&["--bogus"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Error: Unknown option: --bogus"));
}

#[test]
fn test_missing_file_fails() {
    let (_, stderr, code) = run_command(&["/nonexistent/sheet.json"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Error: failed to open"));
}
