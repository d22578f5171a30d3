//! Error types for opening workbooks

use std::path::PathBuf;

use cellgraph_xlsx::XlsxError;
use thiserror::Error;

/// Result type for cellgraph operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a workbook
#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be read as XLSX
    #[error(transparent)]
    Xlsx(#[from] XlsxError),

    /// The file extension names no format we can read
    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}
