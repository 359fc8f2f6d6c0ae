//! Writers for analysis results.
//!
//! - ESRI ASCII rasters (`.asc`), one per layer
//! - A JSON run summary
//! - Planar boundaries as GeoJSON

mod ascii_grid;
mod summary;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::pipeline::HailAnalysis;

pub use ascii_grid::{write_ascii_grid, write_ascii_grid_file, NODATA_VALUE};
pub use summary::{boundaries_feature_collection, AnalysisSummary, GridSummary};

/// Name of the max-size layer.
pub const MAX_SIZE_LAYER: &str = "max_size";

/// Name of the hail-day layer.
pub const HAIL_DAYS_LAYER: &str = "hail_days";

/// Files written for one analysis.
#[derive(Debug, Clone, Default)]
pub struct WrittenOutputs {
    /// Raster files in write order
    pub rasters: Vec<PathBuf>,
    pub summary: PathBuf,
    pub boundaries: PathBuf,
}

impl WrittenOutputs {
    /// Every file written.
    pub fn all(&self) -> impl Iterator<Item = &Path> {
        self.rasters
            .iter()
            .chain([&self.summary, &self.boundaries])
            .map(PathBuf::as_path)
    }
}

/// Write every layer, the summary and the planar boundaries to `dir`.
///
/// The directory is created if missing; existing files are overwritten.
pub fn write_analysis(analysis: &HailAnalysis, dir: &Path) -> Result<WrittenOutputs> {
    fs::create_dir_all(dir)?;
    let grid = &analysis.grid;
    let mut outputs = WrittenOutputs::default();

    let raster = |name: String| dir.join(format!("{}.asc", name));

    let path = raster(MAX_SIZE_LAYER.to_string());
    write_ascii_grid_file(&path, grid, &analysis.max_size)?;
    outputs.rasters.push(path);

    let path = raster(HAIL_DAYS_LAYER.to_string());
    write_ascii_grid_file(&path, grid, &analysis.hail_days)?;
    outputs.rasters.push(path);

    if let Some(seasonal) = &analysis.seasonal {
        for (season, layers) in seasonal {
            let path = raster(format!("{}_{}", MAX_SIZE_LAYER, season.name()));
            write_ascii_grid_file(&path, grid, &layers.max_size)?;
            outputs.rasters.push(path);

            let path = raster(format!("{}_{}", HAIL_DAYS_LAYER, season.name()));
            write_ascii_grid_file(&path, grid, &layers.hail_days)?;
            outputs.rasters.push(path);
        }
    }

    outputs.summary = dir.join("summary.json");
    let summary = AnalysisSummary::from_analysis(analysis);
    fs::write(&outputs.summary, serde_json::to_vec_pretty(&summary)?)?;

    outputs.boundaries = dir.join("boundaries_planar.geojson");
    let collection = boundaries_feature_collection(&analysis.boundaries);
    fs::write(&outputs.boundaries, serde_json::to_vec(&collection)?)?;

    info!(
        dir = %dir.display(),
        rasters = outputs.rasters.len(),
        "Wrote analysis outputs"
    );

    Ok(outputs)
}
