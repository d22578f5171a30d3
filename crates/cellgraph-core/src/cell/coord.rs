//! Sheet-qualified cell coordinates and ranges

use super::CellAddress;
use crate::sheet::SheetId;
use std::fmt;

/// A cell location qualified by its sheet
///
/// Ordering is structural: sheet (workbook order), then row, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellCoord {
    /// Sheet the cell lives on
    pub sheet: SheetId,
    /// Row index (0-based)
    pub row: u32,
    /// Column index (0-based)
    pub col: u16,
}

impl CellCoord {
    /// Create a new coordinate
    pub fn new(sheet: SheetId, row: u32, col: u16) -> Self {
        Self { sheet, row, col }
    }

    /// Create from a sheet and an A1 address (absolute markers are dropped)
    pub fn from_address(sheet: SheetId, addr: &CellAddress) -> Self {
        Self::new(sheet, addr.row, addr.col)
    }

    /// The sheet-less relative address of this coordinate
    pub fn address(&self) -> CellAddress {
        CellAddress::new(self.row, self.col)
    }

    /// Format the row/column part as A1 (e.g. "C7"), without the sheet
    pub fn to_a1_string(&self) -> String {
        self.address().to_a1_string()
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.sheet, self.to_a1_string())
    }
}

/// A rectangular block of cells, possibly spanning several sheets
///
/// Construction normalizes the corners, so `start` is always the first sheet
/// and top-left cell and `end` the last sheet and bottom-right cell. When the
/// sheets differ the range covers every sheet between them in workbook order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// First sheet, top-left corner
    pub start: CellCoord,
    /// Last sheet, bottom-right corner
    pub end: CellCoord,
}

impl CellRange {
    /// Create a new cell range from two opposite corners
    pub fn new(a: CellCoord, b: CellCoord) -> Self {
        Self {
            start: CellCoord::new(a.sheet.min(b.sheet), a.row.min(b.row), a.col.min(b.col)),
            end: CellCoord::new(a.sheet.max(b.sheet), a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Create a single-cell range
    pub fn single(coord: CellCoord) -> Self {
        Self {
            start: coord,
            end: coord,
        }
    }

    /// Whether the range spans more than one sheet
    pub fn is_cross_sheet(&self) -> bool {
        self.start.sheet != self.end.sheet
    }

    /// Number of sheets covered
    pub fn sheet_count(&self) -> usize {
        self.end.sheet.index() - self.start.sheet.index() + 1
    }

    /// Number of rows per sheet
    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Number of columns per sheet
    pub fn col_count(&self) -> u16 {
        self.end.col - self.start.col + 1
    }

    /// Total number of cells across all covered sheets
    pub fn cell_count(&self) -> u64 {
        self.sheet_count() as u64 * self.row_count() as u64 * self.col_count() as u64
    }

    /// Check if a coordinate lies within this range
    pub fn contains(&self, coord: &CellCoord) -> bool {
        coord.sheet >= self.start.sheet
            && coord.sheet <= self.end.sheet
            && coord.row >= self.start.row
            && coord.row <= self.end.row
            && coord.col >= self.start.col
            && coord.col <= self.end.col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(sheet: usize, row: u32, col: u16) -> CellCoord {
        CellCoord::new(SheetId::new(sheet), row, col)
    }

    #[test]
    fn test_coord_ordering() {
        assert!(coord(0, 5, 5) < coord(1, 0, 0));
        assert!(coord(0, 0, 9) < coord(0, 1, 0));
        assert!(coord(0, 1, 0) < coord(0, 1, 1));
    }

    #[test]
    fn test_range_normalizes_corners() {
        let range = CellRange::new(coord(2, 4, 3), coord(0, 1, 7));
        assert_eq!(range.start, coord(0, 1, 3));
        assert_eq!(range.end, coord(2, 4, 7));
        assert!(range.is_cross_sheet());
    }

    #[test]
    fn test_range_counts() {
        let range = CellRange::new(coord(0, 0, 0), coord(2, 1, 1));
        assert_eq!(range.sheet_count(), 3);
        assert_eq!(range.row_count(), 2);
        assert_eq!(range.col_count(), 2);
        assert_eq!(range.cell_count(), 12);

        let single = CellRange::single(coord(1, 4, 4));
        assert_eq!(single.cell_count(), 1);
        assert!(!single.is_cross_sheet());
    }

    #[test]
    fn test_range_contains() {
        let range = CellRange::new(coord(1, 1, 1), coord(2, 3, 3));
        assert!(range.contains(&coord(1, 2, 2)));
        assert!(range.contains(&coord(2, 3, 3)));
        assert!(!range.contains(&coord(0, 2, 2)));
        assert!(!range.contains(&coord(1, 4, 1)));
    }

    #[test]
    fn test_display() {
        assert_eq!(coord(0, 0, 1).to_string(), "#0!B1");
        assert_eq!(coord(3, 99, 27).to_string(), "#3!AB100");
    }
}
