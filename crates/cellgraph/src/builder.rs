//! Graph construction
//!
//! Every formula cell maps to an optional `(source, targets)` entry; the
//! entries, in sheet order and row-major order within a sheet, are folded
//! into a [`DependencyGraph`].
//!
//! # Example
//!
//! ```rust
//! use cellgraph::{build, to_dot, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//! sheet.set_formula("B1", "=A1*2").unwrap();
//!
//! let graph = build(&workbook);
//! assert_eq!(to_dot(&graph), "digraph G {\n\"'Sheet1'!B1\" -> \"'Sheet1'!A1\";\n}");
//! ```

use cellgraph_core::{FormulaCell, SheetId, SheetResolver, Workbook};
use cellgraph_formula::{tokenize, ReferenceToken};

use crate::graph::DependencyGraph;

/// Which formula cells become sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetScope {
    /// Formulas on every sheet
    #[default]
    AllSheets,
    /// Only formulas on the workbook's active sheet
    ///
    /// Their references to other sheets are still followed.
    ActiveSheet,
}

/// Options for graph construction
#[derive(Debug, Clone, Default)]
pub struct GraphOptions {
    /// Which sheets contribute sources (default: all)
    pub scope: SheetScope,
    /// Skip ranges covering more cells than this (default: no limit)
    pub max_range_cells: Option<u64>,
}

/// One source with its targets
type Entry = (String, Vec<String>);

/// Build the dependency graph of a workbook with default options
pub fn build(workbook: &Workbook) -> DependencyGraph {
    build_with_options(workbook, &GraphOptions::default())
}

/// Build the dependency graph of a workbook
pub fn build_with_options(workbook: &Workbook, options: &GraphOptions) -> DependencyGraph {
    let sheets: Vec<SheetId> = match options.scope {
        SheetScope::AllSheets => workbook.worksheets().map(|(id, _)| id).collect(),
        SheetScope::ActiveSheet => vec![workbook.active_sheet()],
    };

    let graph: DependencyGraph = collect_entries(workbook, &sheets, options)
        .into_iter()
        .collect();
    log::debug!(
        "built graph with {} sources and {} edges from {} sheet(s)",
        graph.len(),
        graph.edge_count(),
        sheets.len()
    );
    graph
}

#[cfg(not(feature = "parallel"))]
fn collect_entries(workbook: &Workbook, sheets: &[SheetId], options: &GraphOptions) -> Vec<Entry> {
    collect_entries_sequential(workbook, sheets, options)
}

#[cfg(feature = "parallel")]
fn collect_entries(workbook: &Workbook, sheets: &[SheetId], options: &GraphOptions) -> Vec<Entry> {
    collect_entries_parallel(workbook, sheets, options)
}

#[cfg_attr(feature = "parallel", allow(dead_code))]
fn collect_entries_sequential(
    workbook: &Workbook,
    sheets: &[SheetId],
    options: &GraphOptions,
) -> Vec<Entry> {
    sheets
        .iter()
        .flat_map(|&sheet| sheet_entries(workbook, sheet, options))
        .collect()
}

/// One rayon task per sheet; `collect` keeps the sheet order
#[cfg(feature = "parallel")]
fn collect_entries_parallel(
    workbook: &Workbook,
    sheets: &[SheetId],
    options: &GraphOptions,
) -> Vec<Entry> {
    use rayon::prelude::*;

    let per_sheet: Vec<Vec<Entry>> = sheets
        .par_iter()
        .map(|&sheet| sheet_entries(workbook, sheet, options))
        .collect();
    per_sheet.into_iter().flatten().collect()
}

fn sheet_entries(workbook: &Workbook, sheet: SheetId, options: &GraphOptions) -> Vec<Entry> {
    workbook
        .sheet_formula_cells(sheet)
        .filter_map(|cell| cell_entry(workbook, cell, options))
        .collect()
}

/// The entry for one formula cell, or `None` when it reads no cells
fn cell_entry(workbook: &Workbook, cell: FormulaCell<'_>, options: &GraphOptions) -> Option<Entry> {
    let source = workbook.qualified_name(&cell.coord);

    // A malformed formula comes back empty and is logged by `tokenize`
    let tokens = tokenize(cell.formula, cell.coord.sheet, workbook);

    let mut targets = Vec::new();
    for token in tokens {
        match token {
            ReferenceToken::Single(coord) => targets.push(workbook.qualified_name(&coord)),
            ReferenceToken::Range(_) => {
                if let Some(limit) = options.max_range_cells {
                    let size = token.cell_count();
                    if size > limit {
                        log::warn!(
                            "skipping range of {} cells in {} (limit is {})",
                            size,
                            source,
                            limit
                        );
                        continue;
                    }
                }
                targets.extend(token.cells().map(|coord| workbook.qualified_name(&coord)));
            }
        }
    }

    if targets.is_empty() {
        None
    } else {
        Some((source, targets))
    }
}
