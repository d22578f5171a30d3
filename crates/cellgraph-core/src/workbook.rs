//! The workbook: an ordered list of named worksheets

use ahash::AHashMap;

use crate::cell::CellCoord;
use crate::error::{Error, Result};
use crate::sheet::{SheetId, SheetResolver};
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// Characters Excel refuses in sheet names
const FORBIDDEN_NAME_CHARS: [char; 7] = [':', '\\', '/', '?', '*', '[', ']'];

/// A formula cell found while scanning a workbook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormulaCell<'a> {
    /// Where the formula lives
    pub coord: CellCoord,
    /// Raw formula text
    pub formula: &'a str,
}

/// A workbook
///
/// The position of a sheet in the workbook is its [`SheetId`]; sheets are
/// only ever appended, so ids stay valid.
#[derive(Debug, Clone)]
pub struct Workbook {
    sheets: Vec<Worksheet>,
    /// Lowercased sheet name -> position
    by_name: AHashMap<String, usize>,
    active: usize,
}

impl Workbook {
    /// A workbook with one worksheet, "Sheet1"
    pub fn new() -> Self {
        let mut wb = Self::empty();
        wb.push_sheet(Worksheet::new("Sheet1"));
        wb
    }

    /// A workbook with no worksheets at all
    pub fn empty() -> Self {
        Self {
            sheets: Vec::new(),
            by_name: AHashMap::new(),
            active: 0,
        }
    }

    /// Number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the workbook has no worksheets
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Worksheet at a position
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.sheets.get(index)
    }

    /// Mutable worksheet at a position
    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.sheets.get_mut(index)
    }

    /// Position of the sheet with this name, ignoring case
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(&name.to_lowercase()).copied()
    }

    /// Worksheets with their ids, in workbook order
    pub fn worksheets(&self) -> impl Iterator<Item = (SheetId, &Worksheet)> {
        self.sheets
            .iter()
            .enumerate()
            .map(|(i, ws)| (SheetId::new(i), ws))
    }

    /// Append a worksheet named after the first free "SheetN"
    pub fn add_worksheet(&mut self) -> Result<SheetId> {
        let name = (self.sheets.len() + 1..)
            .map(|n| format!("Sheet{}", n))
            .find(|name| self.sheet_index(name).is_none())
            .ok_or_else(|| Error::InvalidSheetName("no free sheet name".into()))?;
        self.add_worksheet_with_name(&name)
    }

    /// Append a worksheet
    ///
    /// Names are 1-31 characters without any of `: \ / ? * [ ]` and must be
    /// unique, ignoring case.
    pub fn add_worksheet_with_name(&mut self, name: &str) -> Result<SheetId> {
        check_sheet_name(name)?;
        if self.sheet_index(name).is_some() {
            return Err(Error::DuplicateSheetName(name.into()));
        }
        Ok(self.push_sheet(Worksheet::new(name)))
    }

    fn push_sheet(&mut self, sheet: Worksheet) -> SheetId {
        let index = self.sheets.len();
        self.by_name.insert(sheet.name().to_lowercase(), index);
        self.sheets.push(sheet);
        SheetId::new(index)
    }

    /// The sheet that was selected when the workbook was saved
    pub fn active_sheet(&self) -> SheetId {
        SheetId::new(self.active)
    }

    /// Select the active sheet by position
    pub fn set_active_sheet(&mut self, index: usize) -> Result<()> {
        if index >= self.sheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.sheets.len()));
        }
        self.active = index;
        Ok(())
    }

    /// Formula cells of one sheet, row-major
    pub fn sheet_formula_cells(&self, sheet: SheetId) -> impl Iterator<Item = FormulaCell<'_>> {
        self.sheets
            .get(sheet.index())
            .into_iter()
            .flat_map(move |ws| {
                ws.formula_cells().map(move |(row, col, formula)| FormulaCell {
                    coord: CellCoord::new(sheet, row, col),
                    formula,
                })
            })
    }

    /// Every formula cell: sheets in workbook order, cells row-major
    pub fn formula_cells(&self) -> impl Iterator<Item = FormulaCell<'_>> {
        (0..self.sheets.len()).flat_map(move |i| self.sheet_formula_cells(SheetId::new(i)))
    }
}

fn check_sheet_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if len == 0 || len > MAX_SHEET_NAME_LEN {
        return Err(Error::InvalidSheetName(format!(
            "'{}' must be 1 to {} characters long",
            name, MAX_SHEET_NAME_LEN
        )));
    }
    match name.chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c)) {
        Some(c) => Err(Error::InvalidSheetName(format!("'{}' contains '{}'", name, c))),
        None => Ok(()),
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetResolver for Workbook {
    fn resolve_sheet(&self, name: &str) -> Option<SheetId> {
        self.sheet_index(name).map(SheetId::new)
    }

    fn sheet_name(&self, id: SheetId) -> Option<&str> {
        self.sheets.get(id.index()).map(Worksheet::name)
    }
}
