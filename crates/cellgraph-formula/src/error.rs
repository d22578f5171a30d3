//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while scanning a formula
///
/// Unsupported but well-formed constructs (defined names, external
/// workbooks, structured references) are not errors. They simply produce no
/// references.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// The formula text is malformed
    #[error("Parse error at position {position}: {message}")]
    Parse {
        /// Byte offset into the formula text
        position: usize,
        /// What went wrong
        message: String,
    },
}

impl FormulaError {
    pub(crate) fn parse<S: Into<String>>(position: usize, message: S) -> Self {
        FormulaError::Parse {
            position,
            message: message.into(),
        }
    }
}
