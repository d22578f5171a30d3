//! # cellgraph-core
//!
//! Core data structures for the cellgraph dependency extractor.
//!
//! This crate provides:
//! - [`CellAddress`] - A1-style addressing within a sheet
//! - [`SheetId`], [`CellCoord`] and [`CellRange`] - Sheet-qualified locations
//! - [`Workbook`], [`Worksheet`] and [`Cell`] - The in-memory document
//! - [`SheetResolver`] - Name lookup used by the formula tokenizer
//!
//! ## Example
//!
//! ```rust
//! use cellgraph_core::{CellKind, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! sheet.set_cell("A1", 42.0).unwrap();
//! sheet.set_formula("B1", "=A1*2").unwrap();
//!
//! assert_eq!(sheet.kind_at(0, 1), CellKind::Formula);
//! assert_eq!(workbook.formula_cells().count(), 1);
//! ```

pub mod cell;
pub mod error;
pub mod sheet;
pub mod workbook;
pub mod worksheet;

pub use cell::{Cell, CellAddress, CellCoord, CellKind, CellRange};
pub use error::{Error, Result};
pub use sheet::{canonical_name, quote_sheet_name, SheetId, SheetResolver};
pub use workbook::{FormulaCell, Workbook};
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
