//! # cellgraph-xlsx
//!
//! Reads XLSX and XLSM workbooks into a [`cellgraph_core::Workbook`].
//!
//! Only what a dependency graph needs is decoded: sheet names and order,
//! the active tab, cell kinds and formula text. Styles, comments, charts and
//! the rest of the package are ignored.

pub mod error;
pub mod reader;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
