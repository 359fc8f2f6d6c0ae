//! Error types for the ingestion crate.

use std::path::PathBuf;

use hail_common::HailError;
use thiserror::Error;

/// Errors that can occur during ingestion.
///
/// Row-level problems never surface here: the readers drop and count them.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse GeoJSON: {0}")]
    GeoJson(#[from] serde_json::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("Unsupported boundary CRS: {0}")]
    UnsupportedCrs(String),

    #[error(transparent)]
    Hail(#[from] HailError),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestionError>;
