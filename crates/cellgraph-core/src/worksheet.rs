//! Worksheet type

use std::collections::BTreeMap;

use crate::cell::{Cell, CellAddress, CellKind};
use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

/// A worksheet (single sheet in a workbook)
///
/// Cells are stored sparsely, keyed by (row, col), so iteration is always
/// row-major: rows ascending, then columns ascending.
#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Non-blank cells
    cells: BTreeMap<(u32, u16), Cell>,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    // === Cell access ===

    /// Get a cell by A1 address
    pub fn cell(&self, address: &str) -> Result<Option<&Cell>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cell_at(addr.row, addr.col))
    }

    /// Get a cell by row/column index
    pub fn cell_at(&self, row: u32, col: u16) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Kind of the cell at a position (blank if nothing is stored)
    pub fn kind_at(&self, row: u32, col: u16) -> CellKind {
        self.cell_at(row, col).map_or(CellKind::Blank, Cell::kind)
    }

    /// Set a cell by A1 address
    pub fn set_cell<C: Into<Cell>>(&mut self, address: &str, cell: C) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_at(addr.row, addr.col, cell)
    }

    /// Set a cell by row/column index
    ///
    /// Setting a blank cell removes whatever was stored there.
    pub fn set_cell_at<C: Into<Cell>>(&mut self, row: u32, col: u16, cell: C) -> Result<()> {
        self.validate_cell_position(row, col)?;

        let cell = cell.into();
        if cell.is_blank() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), cell);
        }
        Ok(())
    }

    /// Set a formula by A1 address
    pub fn set_formula(&mut self, address: &str, formula: &str) -> Result<()> {
        self.set_cell(address, Cell::formula(formula))
    }

    /// Set a formula by row/column index
    pub fn set_formula_at(&mut self, row: u32, col: u16, formula: &str) -> Result<()> {
        self.set_cell_at(row, col, Cell::formula(formula))
    }

    /// Get the formula text at a cell position (if it's a formula)
    pub fn formula_at(&self, row: u32, col: u16) -> Option<&str> {
        self.cell_at(row, col).and_then(Cell::formula_text)
    }

    fn validate_cell_position(&self, row: u32, col: u16) -> Result<()> {
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }
        if col >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
        }
        Ok(())
    }

    // === Iteration ===

    /// Get the number of stored cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if the worksheet has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over all stored cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u16, &Cell)> {
        self.cells.iter().map(|(&(row, col), cell)| (row, col, cell))
    }

    /// Iterate over all formula cells in row-major order: (row, col, formula_text)
    pub fn formula_cells(&self) -> impl Iterator<Item = (u32, u16, &str)> {
        self.iter_cells()
            .filter_map(|(row, col, cell)| cell.formula_text().map(|text| (row, col, text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut ws = Worksheet::new("Data");
        ws.set_cell("B2", 4.0).unwrap();
        ws.set_formula("C3", "=B2*2").unwrap();

        assert_eq!(ws.cell("B2").unwrap(), Some(&Cell::Number(4.0)));
        assert_eq!(ws.formula_at(2, 2), Some("=B2*2"));
        assert_eq!(ws.kind_at(1, 1), CellKind::Numeric);
        assert_eq!(ws.kind_at(9, 9), CellKind::Blank);
    }

    #[test]
    fn test_blank_removes_cell() {
        let mut ws = Worksheet::new("Data");
        ws.set_cell("A1", "x").unwrap();
        ws.set_cell("A1", Cell::Blank).unwrap();
        assert!(ws.is_empty());
    }

    #[test]
    fn test_iteration_is_row_major() {
        let mut ws = Worksheet::new("Data");
        ws.set_formula("B2", "=1").unwrap();
        ws.set_formula("A2", "=1").unwrap();
        ws.set_cell("C1", 1.0).unwrap();
        ws.set_formula("A1", "=1").unwrap();

        let order: Vec<_> = ws.iter_cells().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(order, vec![(0, 0), (0, 2), (1, 0), (1, 1)]);

        let formulas: Vec<_> = ws.formula_cells().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(formulas, vec![(0, 0), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut ws = Worksheet::new("Data");
        assert!(ws.set_cell_at(MAX_ROWS, 0, 1.0).is_err());
        assert!(ws.set_cell_at(0, MAX_COLS, 1.0).is_err());
    }
}
