//! Error types for grid processing.

use hail_common::HailError;
use projection::ProjectionError;
use thiserror::Error;

/// Errors that can occur while gridding, masking or writing results.
#[derive(Error, Debug)]
pub enum GridProcessorError {
    /// Invalid grid configuration or violated data invariant.
    #[error(transparent)]
    Hail(#[from] HailError),

    /// Boundary reprojection failed.
    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),

    /// Two grids that must share a shape do not.
    #[error("grid shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Failed to write an output file.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize an output document.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GridProcessorError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Hail(HailError::configuration(msg))
    }

    /// Create an invariant violation.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Hail(HailError::invariant(msg))
    }

    /// Whether this error stems from the run's configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Hail(HailError::Configuration(_)))
    }
}

/// Result type for grid processor operations.
pub type Result<T> = std::result::Result<T, GridProcessorError>;
