//! # cellgraph-formula
//!
//! Finds the cells a formula reads from.
//!
//! This is deliberately not a full formula parser: it scans for
//! reference-shaped text and skips everything else (strings, numbers,
//! function names, defined names, structured references). That is enough to
//! build a dependency graph and tolerant of functions it has never heard of.
//!
//! ## Example
//!
//! ```rust
//! use cellgraph_core::Workbook;
//! use cellgraph_formula::tokenize;
//!
//! let mut wb = Workbook::new();
//! wb.add_worksheet_with_name("Data").unwrap();
//!
//! let refs = tokenize("=SUM(A1:A3)*Data!B1", wb.active_sheet(), &wb);
//! let cells: usize = refs.iter().map(|r| r.cells().count()).sum();
//! assert_eq!(cells, 4);
//! ```

pub mod error;
pub mod expand;
pub mod reference;
mod scanner;
pub mod shared;
pub mod tokenizer;

pub use error::{FormulaError, FormulaResult};
pub use expand::{expand, Expansion};
pub use reference::ReferenceToken;
pub use shared::translate_formula;
pub use tokenizer::{cell_references, references, tokenize, References};
