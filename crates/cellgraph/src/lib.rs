//! # cellgraph
//!
//! Extracts the cell dependency graph of a spreadsheet and renders it as a
//! Graphviz DOT digraph.
//!
//! Every formula cell is a source node with an edge to each cell its formula
//! reads. Ranges are expanded to their cells, cross-sheet references are
//! followed, and every node is named `'Sheet'!A1`.
//!
//! ## Features
//!
//! - XLSX/XLSM reading, including shared formulas
//! - Sheet-qualified and 3D (`Jan:Mar!B2`) references
//! - `parallel`: build one sheet per rayon task (same output, sheet order kept)
//!
//! ## Example
//!
//! ```rust
//! use cellgraph::prelude::*;
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//! sheet.set_cell("A1", 1.0).unwrap();
//! sheet.set_formula("B1", "=A1*2").unwrap();
//! sheet.set_formula("C1", "=SUM(A1:B1)").unwrap();
//!
//! let graph = build(&workbook);
//! assert_eq!(graph.edge_count(), 3);
//! println!("{}", to_dot(&graph));
//!
//! // From a file
//! // let workbook = Workbook::open("model.xlsx").unwrap();
//! ```

pub mod builder;
pub mod dot;
pub mod error;
pub mod graph;
pub mod prelude;

pub use builder::{build, build_with_options, GraphOptions, SheetScope};
pub use dot::{to_dot, write_dot};
pub use error::{Error, Result};
pub use graph::DependencyGraph;

// Re-export core types
pub use cellgraph_core::{
    canonical_name, quote_sheet_name, Cell, CellAddress, CellCoord, CellKind, CellRange,
    SheetId, SheetResolver, Workbook, Worksheet, MAX_COLS, MAX_ROWS,
};

// Re-export formula types
pub use cellgraph_formula::{expand, references, tokenize, FormulaError, ReferenceToken};

// Re-export I/O types
pub use cellgraph_xlsx::{XlsxError, XlsxReader};

use std::path::Path;

/// Extension trait for Workbook to add file loading
pub trait WorkbookExt {
    /// Open a workbook from a file, picking the reader by extension
    fn open<P: AsRef<Path>>(path: P) -> Result<Workbook>;
}

impl WorkbookExt for Workbook {
    fn open<P: AsRef<Path>>(path: P) -> Result<Workbook> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("xlsx") | Some("xlsm") => {
                let workbook = XlsxReader::read_file(path)?;
                log::info!(
                    "opened {} ({} sheets)",
                    path.display(),
                    workbook.sheet_count()
                );
                Ok(workbook)
            }
            _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
        }
    }
}
