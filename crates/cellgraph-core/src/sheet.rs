//! Sheet identity and naming

use crate::cell::CellCoord;
use std::fmt;

/// Identifies a sheet by its position in the workbook
///
/// The ordering of `SheetId` is workbook order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SheetId(usize);

impl SheetId {
    /// Create an id for the sheet at `index`
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the sheet in the workbook (0-based)
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Maps between sheet names and sheet ids
///
/// Formula references name sheets; coordinates carry ids. Lookups by name
/// are case-insensitive.
pub trait SheetResolver {
    /// Find the sheet with the given name
    fn resolve_sheet(&self, name: &str) -> Option<SheetId>;

    /// Name of the sheet with the given id
    fn sheet_name(&self, id: SheetId) -> Option<&str>;

    /// Render a coordinate as `'Sheet'!A1`
    ///
    /// Falls back to the id when the sheet is unknown to this resolver.
    fn qualified_name(&self, coord: &CellCoord) -> String {
        match self.sheet_name(coord.sheet) {
            Some(name) => canonical_name(name, coord),
            None => coord.to_string(),
        }
    }
}

/// Quote a sheet name the way formulas do: `'Name'`, with `'` doubled
pub fn quote_sheet_name(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('\'');
    for c in name.chars() {
        if c == '\'' {
            quoted.push('\'');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

/// Canonical node name of a cell: quoted sheet name, `!`, relative A1 address
pub fn canonical_name(sheet_name: &str, coord: &CellCoord) -> String {
    format!("{}!{}", quote_sheet_name(sheet_name), coord.to_a1_string())
}
