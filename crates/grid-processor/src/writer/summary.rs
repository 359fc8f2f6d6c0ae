//! JSON run summary and planar boundary export.

use std::collections::BTreeMap;

use hail_common::geojson::{Feature, FeatureCollection, Geometry};
use hail_common::{BoundaryPolygon, CrsCode, DayKey};
use serde::Serialize;

use crate::grid::Grid;
use crate::pipeline::{HailAnalysis, PipelineDiagnostics};
use crate::types::LayerStats;

use super::{HAIL_DAYS_LAYER, MAX_SIZE_LAYER};

/// Grid geometry as written to the summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSummary {
    pub crs: String,
    pub ncols: usize,
    pub nrows: usize,
    pub resolution_m: f64,
    pub xllcorner: f64,
    pub yllcorner: f64,
    pub xurcorner: f64,
    pub yurcorner: f64,
}

impl GridSummary {
    pub fn from_grid(grid: &Grid, crs: CrsCode) -> Self {
        let extent = grid.extent();
        Self {
            crs: crs.to_string(),
            ncols: grid.ncols(),
            nrows: grid.nrows(),
            resolution_m: grid.resolution(),
            xllcorner: extent.min_x,
            yllcorner: extent.min_y,
            xurcorner: extent.max_x,
            yurcorner: extent.max_y,
        }
    }
}

/// Everything `summary.json` contains.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub grid: GridSummary,
    pub day_key: DayKey,
    pub regions: Vec<String>,
    pub diagnostics: PipelineDiagnostics,
    /// Stats per layer, keyed by raster name (`max_size`, `hail_days_summer`, ...)
    pub layers: BTreeMap<String, LayerStats>,
}

impl AnalysisSummary {
    pub fn from_analysis(analysis: &HailAnalysis) -> Self {
        let mut layers = BTreeMap::new();
        layers.insert(MAX_SIZE_LAYER.to_string(), analysis.max_size.stats());
        layers.insert(HAIL_DAYS_LAYER.to_string(), analysis.hail_days.stats());

        if let Some(seasonal) = &analysis.seasonal {
            for (season, season_layers) in seasonal {
                layers.insert(
                    format!("{}_{}", MAX_SIZE_LAYER, season.name()),
                    season_layers.max_size.stats(),
                );
                layers.insert(
                    format!("{}_{}", HAIL_DAYS_LAYER, season.name()),
                    season_layers.hail_days.stats(),
                );
            }
        }

        Self {
            grid: GridSummary::from_grid(&analysis.grid, analysis.crs),
            day_key: analysis.day_key,
            regions: analysis.boundaries.iter().map(|b| b.region_name.clone()).collect(),
            diagnostics: analysis.diagnostics,
            layers,
        }
    }
}

/// Boundaries as a GeoJSON FeatureCollection, tagged with their CRS.
pub fn boundaries_feature_collection(boundaries: &[BoundaryPolygon]) -> FeatureCollection {
    let crs = boundaries
        .first()
        .map(|b| b.crs)
        .unwrap_or(CrsCode::Epsg2163);

    let features = boundaries
        .iter()
        .map(|b| {
            Feature::new(Geometry::from_multi_polygon(&b.geometry))
                .with_property("region_code", b.region_code.clone())
                .with_property("region_name", b.region_name.clone())
        })
        .collect();

    FeatureCollection::new()
        .with_crs(crs.to_string())
        .with_features(features)
}
