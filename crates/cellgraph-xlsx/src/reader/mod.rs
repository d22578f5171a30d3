//! XLSX reader

mod sheet;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use zip::ZipArchive;

use crate::error::{XlsxError, XlsxResult};
use cellgraph_core::Workbook;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// A `<sheet>` entry of workbook.xml
#[derive(Debug, Clone, PartialEq, Eq)]
struct SheetEntry {
    name: String,
    r_id: String,
}

/// What workbook.xml tells us
#[derive(Debug, Default)]
struct WorkbookPart {
    sheets: Vec<SheetEntry>,
    active_tab: usize,
}

/// Where a sheet relationship points
#[derive(Debug, Clone, PartialEq, Eq)]
enum SheetTarget {
    /// A worksheet part with cells
    Worksheet(String),
    /// A chartsheet, dialog sheet or macro sheet, read as an empty sheet
    Other(String),
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let workbook_part = Self::read_workbook_xml(&mut archive)?;
        let targets = Self::read_workbook_rels(&mut archive)?;

        let mut workbook = Workbook::empty();
        for entry in &workbook_part.sheets {
            let id = workbook.add_worksheet_with_name(&entry.name)?;
            let Some(worksheet) = workbook.worksheet_mut(id.index()) else {
                continue;
            };

            match targets.get(&entry.r_id) {
                Some(SheetTarget::Worksheet(path)) => {
                    let file = archive
                        .by_name(path)
                        .map_err(|_| XlsxError::MissingPart(path.clone()))?;
                    sheet::read_worksheet(file, worksheet, &shared_strings)?;
                    log::debug!(
                        "read sheet '{}' from {} ({} cells)",
                        entry.name,
                        path,
                        worksheet.cell_count()
                    );
                }
                Some(SheetTarget::Other(path)) => {
                    log::debug!("sheet '{}' ({}) has no cells to read", entry.name, path);
                }
                None => {
                    log::warn!(
                        "sheet '{}' refers to unknown relationship '{}', reading it as empty",
                        entry.name,
                        entry.r_id
                    );
                }
            }
        }

        // Ensure at least one sheet exists
        if workbook.is_empty() {
            workbook.add_worksheet()?;
        }

        if workbook.set_active_sheet(workbook_part.active_tab).is_err() {
            log::warn!(
                "active tab {} is out of range for {} sheets, using the first sheet",
                workbook_part.active_tab,
                workbook.sheet_count()
            );
        }

        Ok(workbook)
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(archive: &mut ZipArchive<R>) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name(SHARED_STRINGS_PART) {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut current = String::new();
        let mut in_si = false;
        let mut in_t = false;
        // Phonetic runs (<rPh>) repeat the text in another script
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        strings.push(std::mem::take(&mut current));
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => current.push_str(&e.unescape()?),
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        log::trace!("read {} shared strings", strings.len());
        Ok(strings)
    }

    /// Read workbook.xml to get sheet names, rIds and the active tab
    fn read_workbook_xml<R: Read + Seek>(archive: &mut ZipArchive<R>) -> XlsxResult<WorkbookPart> {
        let file = archive
            .by_name(WORKBOOK_PART)
            .map_err(|_| XlsxError::MissingPart(WORKBOOK_PART.into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut part = WorkbookPart::default();
        let mut seen_view = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"sheet" => {
                        let mut name = None;
                        let mut r_id = None;

                        for attr in e.attributes().flatten() {
                            let key = attr.key;
                            match key.local_name().as_ref() {
                                b"name" if key.prefix().is_none() => {
                                    name = attr.unescape_value().ok().map(|s| s.to_string());
                                }
                                // r:id, whatever the relationships prefix is called
                                b"id" if key.prefix().is_some() => {
                                    r_id = attr.unescape_value().ok().map(|s| s.to_string());
                                }
                                _ => {}
                            }
                        }

                        match (name, r_id) {
                            (Some(name), Some(r_id)) => part.sheets.push(SheetEntry { name, r_id }),
                            _ => {
                                return Err(XlsxError::InvalidFormat(
                                    "<sheet> without name or r:id".into(),
                                ))
                            }
                        }
                    }
                    // Only the first view counts
                    b"workbookView" if !seen_view => {
                        seen_view = true;
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"activeTab" {
                                part.active_tab = attr
                                    .unescape_value()
                                    .ok()
                                    .and_then(|s| s.parse::<usize>().ok())
                                    .unwrap_or(0);
                            }
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(part)
    }

    /// Read workbook.xml.rels to get sheet part paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, SheetTarget>> {
        let file = archive
            .by_name(WORKBOOK_RELS_PART)
            .map_err(|_| XlsxError::MissingPart(WORKBOOK_RELS_PART.into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = None;
                    let mut target = None;
                    let mut rel_type = None;

                    for attr in e.attributes().flatten() {
                        let value = attr.unescape_value().ok().map(|s| s.to_string());
                        match attr.key.as_ref() {
                            b"Id" => id = value,
                            b"Target" => target = value,
                            b"Type" => rel_type = value,
                            _ => {}
                        }
                    }

                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if let Some(kind) = sheet_target(&rel_type, &target) {
                            rels.insert(id, kind);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }
}

/// Classify a workbook relationship; `None` for anything that is not a sheet
fn sheet_target(rel_type: &str, target: &str) -> Option<SheetTarget> {
    let path = part_path(target);
    if rel_type.ends_with("/worksheet") {
        Some(SheetTarget::Worksheet(path))
    } else if rel_type.ends_with("/chartsheet")
        || rel_type.ends_with("/dialogsheet")
        || rel_type.ends_with("/xlMacrosheet")
        || rel_type.ends_with("/xlIntlMacrosheet")
    {
        Some(SheetTarget::Other(path))
    } else {
        None
    }
}

/// Resolve a relationship target against the `xl/` folder
fn part_path(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    }
}
