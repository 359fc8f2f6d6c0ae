//! End-to-end hail climatology run.
//!
//! ```text
//! observations ──► reproject ──► assign ──► aggregate ──┐
//!                                  ▲                     ├─► mask ──► HailAnalysis
//! boundaries ──► reproject ──► bbox ──► grid            │
//!                    └─────────────► footprint ──────────┘
//! ```

use std::collections::BTreeMap;

use hail_common::{BoundaryPolygon, BoundingBox, CrsCode, DayKey, Observation, Season};
use projection::{reproject_boundaries, reproject_points, LambertAzimuthalEqualArea, Reprojector};
use serde::Serialize;
use tracing::info;

use crate::aggregate::{aggregate, aggregate_by_season, Aggregation};
use crate::assign::assign_cells;
use crate::config::GridConfig;
use crate::error::{GridProcessorError, Result};
use crate::grid::Grid;
use crate::mask::{LandFootprint, LandMask};
use crate::types::MaskedGrid;

/// Counts describing what happened to the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineDiagnostics {
    /// Observations handed to the pipeline
    pub observations: usize,
    /// Observations the projection could not map
    pub projection_failures: usize,
    /// Points assigned to a cell
    pub assigned: usize,
    /// Points outside the grid extent
    pub outside_extent: usize,
    /// Cells with at least one detection, before masking
    pub cells_with_data: usize,
    /// Cells with data removed by the land mask
    pub masked_cells: usize,
    /// Cells whose centre is on land
    pub land_cells: usize,
}

/// Masked layers for one season.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalLayers {
    pub max_size: MaskedGrid<f64>,
    pub hail_days: MaskedGrid<u32>,
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct HailAnalysis {
    pub grid: Grid,
    /// CRS of the grid plane
    pub crs: CrsCode,
    /// Boundaries in the grid plane
    pub boundaries: Vec<BoundaryPolygon>,
    /// Planar bounding box of the boundaries
    pub bbox: BoundingBox,
    pub day_key: DayKey,
    /// Maximum hail size per land cell (inches)
    pub max_size: MaskedGrid<f64>,
    /// Distinct hail days per land cell
    pub hail_days: MaskedGrid<u32>,
    /// Per-season layers, present when seasonal output was requested
    pub seasonal: Option<BTreeMap<Season, SeasonalLayers>>,
    pub diagnostics: PipelineDiagnostics,
}

/// Runs the climatology over a [`Reprojector`].
#[derive(Debug, Clone)]
pub struct HailPipeline<P> {
    config: GridConfig,
    reprojector: P,
}

impl HailPipeline<LambertAzimuthalEqualArea> {
    /// Pipeline projecting onto the US National Atlas Equal Area plane.
    pub fn us_national_atlas(config: GridConfig) -> Result<Self> {
        Self::new(config, LambertAzimuthalEqualArea::us_national_atlas())
    }
}

impl<P: Reprojector> HailPipeline<P> {
    /// Create a pipeline, validating the configuration up front.
    pub fn new(config: GridConfig, reprojector: P) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, reprojector })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Grid, aggregate and mask one batch of cleaned observations.
    ///
    /// # Arguments
    /// * `observations` - Cleaned detections (geographic coordinates)
    /// * `boundaries` - Contiguous-US regions (geographic coordinates)
    ///
    /// # Errors
    /// Fails before any aggregation when the boundaries are empty, cannot be
    /// projected, or the grid configuration does not fit their extent.
    pub fn run(&self, observations: Vec<Observation>, boundaries: &[BoundaryPolygon]) -> Result<HailAnalysis> {
        let planar_boundaries = reproject_boundaries(&self.reprojector, boundaries)?;
        let bbox = BoundingBox::enclosing(planar_boundaries.iter().filter_map(BoundaryPolygon::bbox))
            .ok_or_else(|| GridProcessorError::config("no boundary polygons to grid over"))?;
        let grid = Grid::build(&bbox, self.config.resolution_m, self.config.extent)?;
        info!(
            ncols = grid.ncols(),
            nrows = grid.nrows(),
            resolution_m = grid.resolution(),
            regions = planar_boundaries.len(),
            "Grid built over boundary extent"
        );

        let mut diagnostics = PipelineDiagnostics {
            observations: observations.len(),
            ..Default::default()
        };

        let projected = reproject_points(&self.reprojector, observations);
        diagnostics.projection_failures = projected.failed;

        let assignment = assign_cells(&grid, &projected.points);
        diagnostics.assigned = assignment.assigned.len();
        diagnostics.outside_extent = assignment.outside_extent;

        let aggregation = aggregate(&grid, &assignment.assigned, self.config.day_key);
        diagnostics.cells_with_data = aggregation.occupied_cells();

        let footprint = LandFootprint::new(&planar_boundaries, self.reprojector.target_crs())?;
        let mask = LandMask::build(&grid, &footprint);
        diagnostics.land_cells = mask.land_cells();

        let (max_size, hail_days) = masked_layers(&mask, &aggregation)?;
        diagnostics.masked_cells = diagnostics.cells_with_data - hail_days.cells_with_data();

        let seasonal = if self.config.seasonal {
            let by_season = aggregate_by_season(&grid, &assignment.assigned, self.config.day_key);
            let mut layers = BTreeMap::new();
            for (season, aggregation) in by_season {
                let (max_size, hail_days) = masked_layers(&mask, &aggregation)?;
                layers.insert(season, SeasonalLayers { max_size, hail_days });
            }
            Some(layers)
        } else {
            None
        };

        info!(
            observations = diagnostics.observations,
            assigned = diagnostics.assigned,
            outside_extent = diagnostics.outside_extent,
            cells_with_data = diagnostics.cells_with_data,
            masked_cells = diagnostics.masked_cells,
            "Hail climatology complete"
        );

        Ok(HailAnalysis {
            grid,
            crs: self.reprojector.target_crs(),
            boundaries: planar_boundaries,
            bbox,
            day_key: self.config.day_key,
            max_size,
            hail_days,
            seasonal,
            diagnostics,
        })
    }
}

fn masked_layers(mask: &LandMask, aggregation: &Aggregation) -> Result<(MaskedGrid<f64>, MaskedGrid<u32>)> {
    Ok((
        mask.apply(&aggregation.max_size_grid())?,
        mask.apply(&aggregation.hail_day_grid())?,
    ))
}
