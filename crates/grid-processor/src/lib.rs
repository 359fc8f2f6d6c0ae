//! Equal-area gridding of radar hail detections.
//!
//! Turns cleaned detections and state boundaries into per-cell hail
//! climatology layers: the largest hail size and the number of distinct
//! hail days, masked to land.
//!
//! # Architecture
//!
//! ```text
//! Vec<Observation>, &[BoundaryPolygon]
//!      │
//!      ▼
//! HailPipeline::run
//!      │
//!      ├─► Reproject boundaries, take their planar bbox
//!      │
//!      ├─► Grid::build (edges = min + i·R)
//!      │
//!      ├─► Reproject detections (rayon map)
//!      │
//!      ├─► assign_cells (floor rule, outside-extent points counted)
//!      │
//!      ├─► aggregate (rayon fold + merge; optional per season)
//!      │
//!      └─► LandMask::apply (cell centre ∩ boundaries)
//!               │
//!               ▼
//!          HailAnalysis ──► writer::write_analysis
//! ```
//!
//! # Example
//!
//! ```ignore
//! use grid_processor::{write_analysis, GridConfig, HailPipeline};
//!
//! let pipeline = HailPipeline::us_national_atlas(GridConfig::default())?;
//! let analysis = pipeline.run(observations, &boundaries)?;
//! write_analysis(&analysis, Path::new("out"))?;
//! ```

pub mod aggregate;
pub mod assign;
pub mod config;
pub mod error;
pub mod grid;
pub mod mask;
pub mod pipeline;
pub mod types;
pub mod writer;

// Re-export commonly used types at crate root
pub use aggregate::{aggregate, aggregate_by_season, Aggregation, CellAccumulator};
pub use assign::{assign_cells, floor_bucket, AssignedPoint, CellAssignment, CellIndex};
pub use config::{ExtentOverride, GridConfig, DEFAULT_RESOLUTION_M};
pub use error::{GridProcessorError, Result};
pub use grid::Grid;
pub use mask::{Footprint, LandFootprint, LandMask};
pub use pipeline::{HailAnalysis, HailPipeline, PipelineDiagnostics, SeasonalLayers};
pub use types::{CellGrid, LayerStats, MaskedGrid};
pub use writer::{write_analysis, WrittenOutputs};
