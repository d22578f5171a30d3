//! Test helpers

#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

#[path = "../../../cellgraph-xlsx/tests/common/mod.rs"]
mod fixture;

pub use fixture::XlsxFixture;

/// Run the binary with the given arguments
pub fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cellgraph"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run cellgraph")
}

/// A formula cell as `<c>` XML
pub fn formula_cell(addr: &str, formula: &str) -> String {
    format!(r#"<c r="{}"><f>{}</f></c>"#, addr, formula)
}

/// Write an XLSX file; each sheet is `(name, [cell XML])`, all cells in row 1
pub fn write_xlsx(path: &Path, sheets: &[(&str, &[String])], active_tab: usize) {
    sheets
        .iter()
        .fold(XlsxFixture::new().active_tab(active_tab), |fixture, (name, cells)| {
            fixture.sheet(name, &format!(r#"<row r="1">{}</row>"#, cells.concat()))
        })
        .write_to(path);
}
