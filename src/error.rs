//! Error types for the residual-diagnostics library.

use thiserror::Error;

/// Result type alias for diagnostic operations.
pub type Result<T> = std::result::Result<T, DiagnosticError>;

/// Errors that can occur while preparing or running diagnostics.
///
/// Only malformed input and contradictory configuration end up here.
/// Degenerate statistics and inadmissible groups are reported through
/// result values instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagnosticError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Group index out of bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Group name not present in the table.
    #[error("unknown group: {0}")]
    UnknownGroup(String),

    /// A record in the input table is malformed.
    #[error("invalid record at row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },
}
