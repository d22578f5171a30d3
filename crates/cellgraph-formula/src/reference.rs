//! Reference tokens extracted from formulas

use crate::expand::{expand, Expansion};
use cellgraph_core::{CellCoord, CellRange};

/// A cell or range that a formula reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceToken {
    /// A single cell (e.g. `B2`, `Sheet2!$C$1`)
    Single(CellCoord),
    /// A rectangular range, possibly spanning sheets (e.g. `A1:B3`, `S1:S3!A1`)
    Range(CellRange),
}

impl ReferenceToken {
    /// The covered cells as a range (a single cell becomes a 1x1 range)
    pub fn as_range(&self) -> CellRange {
        match self {
            ReferenceToken::Single(coord) => CellRange::single(*coord),
            ReferenceToken::Range(range) => *range,
        }
    }

    /// Number of cells the reference covers
    pub fn cell_count(&self) -> u64 {
        self.as_range().cell_count()
    }

    /// Iterate over every covered cell in expansion order
    pub fn cells(&self) -> Expansion {
        expand(&self.as_range())
    }
}
