//! In-memory XLSX fixtures

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

enum SheetPart {
    Worksheet(String),
    Chartsheet,
}

/// Builds a minimal but valid XLSX package
#[derive(Default)]
pub struct XlsxFixture {
    sheets: Vec<(String, SheetPart)>,
    active_tab: Option<usize>,
    shared_strings: Vec<String>,
}

impl XlsxFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a worksheet; `sheet_data` is the inner XML of `<sheetData>`
    pub fn sheet(mut self, name: &str, sheet_data: &str) -> Self {
        self.sheets
            .push((name.to_string(), SheetPart::Worksheet(sheet_data.to_string())));
        self
    }

    pub fn chartsheet(mut self, name: &str) -> Self {
        self.sheets.push((name.to_string(), SheetPart::Chartsheet));
        self
    }

    pub fn active_tab(mut self, tab: usize) -> Self {
        self.active_tab = Some(tab);
        self
    }

    pub fn shared_strings(mut self, strings: &[&str]) -> Self {
        self.shared_strings = strings.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buf));
            let options = SimpleFileOptions::default();

            let mut put = |name: &str, body: String| {
                zip.start_file(name, options).unwrap();
                zip.write_all(body.as_bytes()).unwrap();
            };

            put(
                "[Content_Types].xml",
                r#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/></Types>"#.to_string(),
            );
            put(
                "_rels/.rels",
                format!(r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#, REL_BASE),
            );

            let mut sheets_xml = String::new();
            let mut rels_xml = String::new();
            for (i, (name, part)) in self.sheets.iter().enumerate() {
                let n = i + 1;
                sheets_xml.push_str(&format!(
                    r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                    escape(name),
                    n,
                    n
                ));
                match part {
                    SheetPart::Worksheet(data) => {
                        rels_xml.push_str(&format!(
                            r#"<Relationship Id="rId{}" Type="{}/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                            n, REL_BASE, n
                        ));
                        put(
                            &format!("xl/worksheets/sheet{}.xml", n),
                            format!(r#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#, data),
                        );
                    }
                    SheetPart::Chartsheet => {
                        rels_xml.push_str(&format!(
                            r#"<Relationship Id="rId{}" Type="{}/chartsheet" Target="chartsheets/sheet{}.xml"/>"#,
                            n, REL_BASE, n
                        ));
                        put(
                            &format!("xl/chartsheets/sheet{}.xml", n),
                            r#"<?xml version="1.0"?><chartsheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"/>"#.to_string(),
                        );
                    }
                }
            }

            if !self.shared_strings.is_empty() {
                let items: String = self
                    .shared_strings
                    .iter()
                    .map(|s| format!("<si><t>{}</t></si>", escape(s)))
                    .collect();
                put(
                    "xl/sharedStrings.xml",
                    format!(r#"<?xml version="1.0"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">{}</sst>"#, items),
                );
                rels_xml.push_str(&format!(
                    r#"<Relationship Id="rIdSst" Type="{}/sharedStrings" Target="sharedStrings.xml"/>"#,
                    REL_BASE
                ));
            }

            let views = match self.active_tab {
                Some(tab) => format!(r#"<bookViews><workbookView activeTab="{}"/></bookViews>"#, tab),
                None => String::new(),
            };
            put(
                "xl/workbook.xml",
                format!(r#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="{}">{}<sheets>{}</sheets></workbook>"#, REL_BASE, views, sheets_xml),
            );
            put(
                "xl/_rels/workbook.xml.rels",
                format!(r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#, rels_xml),
            );

            zip.finish().unwrap();
        }
        buf
    }

    pub fn write_to(&self, path: &Path) {
        std::fs::write(path, self.build()).unwrap();
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
