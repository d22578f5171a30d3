//! cellgraph CLI - print the cell dependency graph of a workbook

use anyhow::{Context, Result};
use cellgraph::prelude::*;
use clap::{ArgAction, Parser};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cellgraph")]
#[command(
    author,
    version,
    about = "Print the cell dependency graph of a spreadsheet as Graphviz DOT"
)]
struct Cli {
    /// Input workbook (xlsx, xlsm)
    workbook: PathBuf,

    /// Only formulas on the active sheet become sources
    #[arg(long)]
    active_sheet: bool,

    /// Skip ranges covering more than N cells
    #[arg(long, value_name = "N")]
    max_range_cells: Option<u64>,

    /// Output DOT file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Raise the log level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn graph_options(&self) -> GraphOptions {
        GraphOptions {
            scope: if self.active_sheet {
                SheetScope::ActiveSheet
            } else {
                SheetScope::AllSheets
            },
            max_range_cells: self.max_range_cells,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let workbook = Workbook::open(&cli.workbook)
        .with_context(|| format!("Failed to open '{}'", cli.workbook.display()))?;

    let graph = build_with_options(&workbook, &cli.graph_options());
    let mut dot = to_dot(&graph);
    dot.push('\n');

    match &cli.output {
        Some(path) => write_output(path, &dot, &graph)?,
        None => io::stdout()
            .write_all(dot.as_bytes())
            .context("Failed to write to stdout")?,
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `-v`
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Fails only if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .try_init();
}

fn write_output(path: &Path, dot: &str, graph: &DependencyGraph) -> Result<()> {
    std::fs::write(path, dot).with_context(|| format!("Failed to write '{}'", path.display()))?;
    tracing::info!(
        "wrote {} edges from {} sources to '{}'",
        graph.edge_count(),
        graph.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_map_to_options() {
        let cli = Cli::parse_from(["cellgraph", "model.xlsx"]);
        let options = cli.graph_options();
        assert_eq!(options.scope, SheetScope::AllSheets);
        assert_eq!(options.max_range_cells, None);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::parse_from([
            "cellgraph",
            "--active-sheet",
            "--max-range-cells",
            "100",
            "-vv",
            "-o",
            "out.dot",
            "model.xlsx",
        ]);
        let options = cli.graph_options();
        assert_eq!(options.scope, SheetScope::ActiveSheet);
        assert_eq!(options.max_range_cells, Some(100));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, Some(PathBuf::from("out.dot")));
    }

    #[test]
    fn test_workbook_is_required() {
        assert!(Cli::try_parse_from(["cellgraph"]).is_err());
    }
}
