//! Range expansion
//!
//! Ranges expand sheet by sheet in workbook order, and row-major within each
//! sheet: every column of the top row left to right, then the next row.

use cellgraph_core::{CellCoord, CellRange, SheetId};

/// Iterate over every cell of a range
///
/// # Examples
/// ```
/// use cellgraph_core::{CellCoord, CellRange, SheetId};
/// use cellgraph_formula::expand;
///
/// let s = SheetId::new(0);
/// let range = CellRange::new(CellCoord::new(s, 0, 0), CellCoord::new(s, 1, 1));
/// let cells: Vec<String> = expand(&range).map(|c| c.to_a1_string()).collect();
/// assert_eq!(cells, ["A1", "B1", "A2", "B2"]);
/// ```
pub fn expand(range: &CellRange) -> Expansion {
    Expansion {
        range: *range,
        next: Some(range.start),
        remaining: range.cell_count(),
    }
}

/// Iterator returned by [`expand`]
#[derive(Debug, Clone)]
pub struct Expansion {
    range: CellRange,
    next: Option<CellCoord>,
    remaining: u64,
}

impl Expansion {
    /// Number of cells not yet yielded
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    fn successor(&self, cur: CellCoord) -> Option<CellCoord> {
        let CellRange { start, end } = self.range;
        if cur.col < end.col {
            Some(CellCoord::new(cur.sheet, cur.row, cur.col + 1))
        } else if cur.row < end.row {
            Some(CellCoord::new(cur.sheet, cur.row + 1, start.col))
        } else if cur.sheet < end.sheet {
            let sheet = SheetId::new(cur.sheet.index() + 1);
            Some(CellCoord::new(sheet, start.row, start.col))
        } else {
            None
        }
    }
}

impl Iterator for Expansion {
    type Item = CellCoord;

    fn next(&mut self) -> Option<CellCoord> {
        let cur = self.next?;
        self.next = self.successor(cur);
        self.remaining -= 1;
        Some(cur)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl std::iter::FusedIterator for Expansion {}
