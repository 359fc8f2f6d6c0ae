//! Error types shared by the hail pipeline crates.

use thiserror::Error;

/// Result type alias using HailError.
pub type HailResult<T> = Result<T, HailError>;

/// Primary error type for data-model and configuration failures.
#[derive(Debug, Error)]
pub enum HailError {
    /// A single input row could not be interpreted.
    #[error("Parse error at row {row}: {message}")]
    Parse { row: u64, message: String },

    /// An internal invariant was broken. Signals a bug upstream, never bad input.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Invalid run configuration. Raised before any aggregation happens.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl HailError {
    /// Create a Parse error for the given row.
    pub fn parse(row: u64, message: impl Into<String>) -> Self {
        Self::Parse {
            row,
            message: message.into(),
        }
    }

    /// Create an InvariantViolation error.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// Create a Configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether the pipeline must abort on this error.
    ///
    /// Row-level parse failures are dropped and counted by the loaders.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, HailError::Parse { .. })
    }
}
