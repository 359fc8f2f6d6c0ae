//! Radar hail detection and boundary ingestion.
//!
//! Reads the two inputs of a hail climatology run:
//!
//! - Hail detections from a CSV export (NOAA SWDI `nx3hail` layout or
//!   equivalent column names), cleaned of sentinel and low-confidence rows
//! - State boundary polygons from GeoJSON, restricted to the contiguous US
//!
//! Both readers accept any `io::Read`; the `load_*` helpers open files and
//! transparently decompress `.gz` inputs.

pub mod boundaries;
pub mod config;
pub mod error;
pub mod observations;
pub mod source;

// Re-exports
pub use boundaries::{from_feature_collection, load_boundaries, read_boundaries, BoundaryLoad};
pub use config::{classify, CleaningOptions, RowDisposition, PROBABILITY_SENTINEL};
pub use error::{IngestionError, Result};
pub use observations::{
    filter_observations, load_observations, read_observations, CleanedObservations, CleaningReport,
};
pub use source::{detect_compression, open_input, Compression};
