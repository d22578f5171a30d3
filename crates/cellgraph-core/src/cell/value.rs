//! Cell contents

use std::fmt;

/// The broad category of a cell's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// The cell holds a formula
    Formula,
    /// Numeric value (dates included)
    Numeric,
    /// String value
    Text,
    /// TRUE/FALSE
    Boolean,
    /// Error value such as #DIV/0!
    Error,
    /// No value
    Blank,
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CellKind::Formula => "formula",
            CellKind::Numeric => "numeric",
            CellKind::Text => "text",
            CellKind::Boolean => "boolean",
            CellKind::Error => "error",
            CellKind::Blank => "blank",
        };
        f.write_str(s)
    }
}

/// The content of a single cell
///
/// Formula cells keep only their raw text. Cached results are not needed to
/// find what a formula reads.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Empty cell (may still exist in the file, e.g. for styling)
    #[default]
    Blank,
    /// Numeric value
    Number(f64),
    /// String value
    Text(String),
    /// Boolean value
    Boolean(bool),
    /// Error value, as written (e.g. "#N/A")
    Error(String),
    /// Formula text, as written (with or without a leading '=')
    Formula(String),
}

impl Cell {
    /// Create a formula cell
    pub fn formula<S: Into<String>>(text: S) -> Self {
        Cell::Formula(text.into())
    }

    /// The kind of content held
    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Blank => CellKind::Blank,
            Cell::Number(_) => CellKind::Numeric,
            Cell::Text(_) => CellKind::Text,
            Cell::Boolean(_) => CellKind::Boolean,
            Cell::Error(_) => CellKind::Error,
            Cell::Formula(_) => CellKind::Formula,
        }
    }

    /// The formula text, if this is a formula cell
    pub fn formula_text(&self) -> Option<&str> {
        match self {
            Cell::Formula(text) => Some(text),
            _ => None,
        }
    }

    /// Check if the cell is blank
    pub fn is_blank(&self) -> bool {
        matches!(self, Cell::Blank)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Boolean(b)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}
