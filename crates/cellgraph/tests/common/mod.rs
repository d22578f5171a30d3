//! Test helpers

#![allow(dead_code)]

use std::path::Path;

use cellgraph::Workbook;

#[path = "../../../cellgraph-xlsx/tests/common/mod.rs"]
mod fixture;

pub use fixture::XlsxFixture;

/// Build a workbook from `(sheet name, [(address, formula)])`
pub fn workbook(sheets: &[(&str, &[(&str, &str)])]) -> Workbook {
    let mut wb = Workbook::empty();
    for (name, formulas) in sheets {
        let id = wb.add_worksheet_with_name(name).unwrap();
        let ws = wb.worksheet_mut(id.index()).unwrap();
        for (addr, formula) in formulas.iter() {
            ws.set_formula(addr, formula).unwrap();
        }
    }
    wb
}

/// Write an XLSX file; each sheet is `(name, inner XML of <sheetData>)`
pub fn write_xlsx(path: &Path, sheets: &[(&str, &str)]) {
    sheets
        .iter()
        .fold(XlsxFixture::new(), |fixture, (name, data)| fixture.sheet(name, data))
        .write_to(path);
}
