//! Worksheet part (`xl/worksheets/sheetN.xml`)

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use cellgraph_core::{Cell, CellAddress, Worksheet};
use cellgraph_formula::translate_formula;

/// The anchor cell and text of a shared formula group
#[derive(Debug, Clone)]
struct SharedFormula {
    anchor: CellAddress,
    text: String,
}

/// Everything collected between `<c>` and `</c>`
#[derive(Debug, Default)]
struct PendingCell {
    reference: Option<String>,
    cell_type: Option<String>,
    value: Option<String>,
    formula: Option<String>,
    shared_index: Option<u32>,
}

/// What the `<f>` element of a cell amounts to
#[derive(Debug)]
enum FormulaSlot {
    None,
    Text(String),
    /// A shared-formula child whose master was never seen
    Orphan(u32),
}

/// Parse one worksheet part into `worksheet`
pub(super) fn read_worksheet<R: Read>(
    reader: R,
    worksheet: &mut Worksheet,
    shared_strings: &[String],
) -> XlsxResult<()> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);
    SheetParser::new(worksheet, shared_strings).run(&mut xml_reader)
}

struct SheetParser<'a> {
    worksheet: &'a mut Worksheet,
    shared_strings: &'a [String],
    shared_formulas: HashMap<u32, SharedFormula>,
    cell: PendingCell,
    in_cell: bool,
    in_value: bool,
    in_formula: bool,
    in_inline_str: bool,
    in_inline_text: bool,
}

impl<'a> SheetParser<'a> {
    fn new(worksheet: &'a mut Worksheet, shared_strings: &'a [String]) -> Self {
        Self {
            worksheet,
            shared_strings,
            shared_formulas: HashMap::new(),
            cell: PendingCell::default(),
            in_cell: false,
            in_value: false,
            in_formula: false,
            in_inline_str: false,
            in_inline_text: false,
        }
    }

    fn run<B: BufRead>(mut self, xml_reader: &mut Reader<B>) -> XlsxResult<()> {
        let mut buf = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"c" => {
                        self.in_cell = true;
                        self.cell = Self::cell_attrs(&e);
                    }
                    b"v" if self.in_cell => self.in_value = true,
                    b"f" if self.in_cell => {
                        self.in_formula = true;
                        self.formula_attrs(&e);
                    }
                    b"is" if self.in_cell => self.in_inline_str = true,
                    b"t" if self.in_inline_str => {
                        self.in_inline_text = true;
                        self.cell.cell_type = Some("inlineStr".into());
                    }
                    _ => {}
                },
                // A childless <c/> holds nothing worth storing
                Ok(Event::Empty(e)) => {
                    if self.in_cell && e.local_name().as_ref() == b"f" {
                        self.formula_attrs(&e);
                    }
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"c" => {
                        let cell = std::mem::take(&mut self.cell);
                        self.process_cell(cell)?;
                        self.in_cell = false;
                    }
                    b"v" => self.in_value = false,
                    b"f" => self.in_formula = false,
                    b"is" => self.in_inline_str = false,
                    b"t" => self.in_inline_text = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if self.in_value || self.in_inline_text || self.in_formula => {
                    let text = e.unescape()?;
                    let target = if self.in_formula {
                        &mut self.cell.formula
                    } else {
                        &mut self.cell.value
                    };
                    target.get_or_insert_with(String::new).push_str(&text);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }

    fn cell_attrs(e: &BytesStart<'_>) -> PendingCell {
        let mut cell = PendingCell::default();
        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"r" => cell.reference = attr.unescape_value().ok().map(|s| s.to_string()),
                b"t" => cell.cell_type = attr.unescape_value().ok().map(|s| s.to_string()),
                _ => {}
            }
        }
        cell
    }

    fn formula_attrs(&mut self, e: &BytesStart<'_>) {
        self.cell.formula.get_or_insert_with(String::new);

        let mut shared = false;
        let mut index = None;
        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"t" => shared = attr.value.as_ref() == b"shared",
                b"si" => {
                    index = attr
                        .unescape_value()
                        .ok()
                        .and_then(|s| s.parse::<u32>().ok());
                }
                _ => {}
            }
        }
        if shared {
            self.cell.shared_index = index;
        }
    }

    fn process_cell(&mut self, cell: PendingCell) -> XlsxResult<()> {
        let Some(cell_ref) = cell.reference.as_deref() else {
            log::debug!("skipping cell without a reference in sheet '{}'", self.worksheet.name());
            return Ok(());
        };
        let addr = CellAddress::parse(cell_ref).map_err(|e| {
            XlsxError::Parse(format!("Invalid cell reference '{}': {}", cell_ref, e))
        })?;

        let value = match self.formula_slot(&cell, addr) {
            FormulaSlot::Text(text) => {
                let text = if text.starts_with('=') {
                    text
                } else {
                    format!("={}", text)
                };
                Cell::Formula(text)
            }
            FormulaSlot::Orphan(si) => {
                log::warn!(
                    "shared formula {} at '{}'!{} has no master cell, storing it as blank",
                    si,
                    self.worksheet.name(),
                    cell_ref
                );
                Cell::Blank
            }
            FormulaSlot::None => {
                value_cell(cell.cell_type.as_deref(), cell.value.as_deref(), self.shared_strings)?
            }
        };

        self.worksheet.set_cell_at(addr.row, addr.col, value)?;
        Ok(())
    }

    fn formula_slot(&mut self, cell: &PendingCell, addr: CellAddress) -> FormulaSlot {
        let text = match cell.formula.as_deref() {
            Some(text) => text,
            None => return FormulaSlot::None,
        };

        let Some(si) = cell.shared_index else {
            return if text.is_empty() {
                FormulaSlot::None
            } else {
                FormulaSlot::Text(text.to_string())
            };
        };

        if !text.is_empty() {
            self.shared_formulas.insert(
                si,
                SharedFormula {
                    anchor: addr,
                    text: text.to_string(),
                },
            );
            return FormulaSlot::Text(text.to_string());
        }

        let Some(master) = self.shared_formulas.get(&si) else {
            return FormulaSlot::Orphan(si);
        };
        let rows = addr.row as i64 - master.anchor.row as i64;
        let cols = addr.col as i64 - master.anchor.col as i64;
        match translate_formula(&master.text, rows, cols) {
            Ok(translated) => {
                log::trace!("shared formula {} at {}: {}", si, addr, translated);
                FormulaSlot::Text(translated)
            }
            Err(e) => {
                // Malformed either way; the child keeps the master text
                log::debug!("cannot translate shared formula {}: {}", si, e);
                FormulaSlot::Text(master.text.clone())
            }
        }
    }
}

/// Decode a non-formula cell from its type attribute and `<v>` text
fn value_cell(cell_type: Option<&str>, value: Option<&str>, shared_strings: &[String]) -> XlsxResult<Cell> {
    let value = match value {
        Some(v) => v,
        None => return Ok(Cell::Blank),
    };

    let cell = match cell_type {
        // Shared string
        Some("s") => {
            let idx: usize = value.parse().map_err(|_| {
                XlsxError::Parse(format!("Invalid shared string index: {}", value))
            })?;
            let s = shared_strings.get(idx).ok_or_else(|| {
                XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
            })?;
            Cell::Text(s.clone())
        }
        Some("str") | Some("inlineStr") => Cell::Text(value.to_string()),
        Some("b") => Cell::Boolean(value == "1" || value.eq_ignore_ascii_case("true")),
        Some("e") => Cell::Error(value.to_string()),
        None | Some("n") => match value.parse::<f64>() {
            Ok(n) => Cell::Number(n),
            Err(_) => Cell::Text(value.to_string()),
        },
        // ISO 8601 dates ("d") and anything unknown keep their text
        Some(_) => Cell::Text(value.to_string()),
    };
    Ok(cell)
}
