//! End-to-end tests of the `cellgraph` binary

mod common;

use common::{formula_cell, run, write_xlsx};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::TempDir;

/// Two sheets; "Data" is the active one
fn fixture(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("model.xlsx");
    write_xlsx(
        &path,
        &[
            ("Sheet1", &[formula_cell("B1", "SUM(A1:A2)")]),
            ("Data", &[formula_cell("A1", "Sheet1!B1*2")]),
        ],
        1,
    );
    path
}

const FULL_GRAPH: &str = "digraph G {\n\
\"'Sheet1'!B1\" -> \"'Sheet1'!A1\";\n\
\"'Sheet1'!B1\" -> \"'Sheet1'!A2\";\n\
\"'Data'!A1\" -> \"'Sheet1'!B1\";\n\
}\n";

#[test]
fn test_prints_graph_to_stdout() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    let output = run(&[path.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), FULL_GRAPH);
}

#[test]
fn test_output_file() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);
    let out = dir.path().join("graph.dot");

    let output = run(&[path.to_str().unwrap(), "-o", out.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert_eq!(std::fs::read_to_string(&out).unwrap(), FULL_GRAPH);
}

#[test]
fn test_active_sheet_only() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    let output = run(&["--active-sheet", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "digraph G {\n\"'Data'!A1\" -> \"'Sheet1'!B1\";\n}\n"
    );
}

#[test]
fn test_max_range_cells() {
    let dir = TempDir::new().unwrap();
    let path = fixture(&dir);

    let output = run(&["--max-range-cells", "1", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "digraph G {\n\"'Data'!A1\" -> \"'Sheet1'!B1\";\n}\n"
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("skipping range"));
}

#[test]
fn test_empty_workbook() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.xlsx");
    write_xlsx(&path, &[("Sheet1", &[])], 0);

    let output = run(&[path.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "digraph G {\n}\n");
}

#[test]
fn test_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.xlsx");

    let output = run(&[path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to open"));
}

#[test]
fn test_not_a_zip_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.xlsx");
    std::fs::write(&path, b"not a workbook").unwrap();

    let output = run(&[path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unsupported_extension_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.ods");
    std::fs::write(&path, b"").unwrap();

    let output = run(&[path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
