//! Land masking of gridded results.
//!
//! A cell is on land when its centre intersects any planar boundary
//! polygon (points on a polygon edge count as inside).

use geo::{BoundingRect, Coord, Intersects, MultiPolygon, Rect};
use hail_common::{BoundaryPolygon, CrsCode};
use rayon::prelude::*;
use tracing::debug;

use crate::error::{GridProcessorError, Result};
use crate::grid::Grid;
use crate::types::{CellGrid, MaskedGrid};

/// Something that can say whether a planar point is covered.
pub trait Footprint: Send + Sync {
    /// Whether (x, y), in the grid's planar CRS, is covered.
    fn covers(&self, x: f64, y: f64) -> bool;
}

/// Union of planar boundary polygons.
#[derive(Debug, Clone)]
pub struct LandFootprint {
    regions: Vec<(Rect<f64>, MultiPolygon<f64>)>,
}

impl LandFootprint {
    /// Build a footprint from boundaries already projected onto `plane`,
    /// the CRS the grid is laid out in.
    pub fn new(boundaries: &[BoundaryPolygon], plane: CrsCode) -> Result<Self> {
        let mut regions = Vec::with_capacity(boundaries.len());
        for boundary in boundaries {
            if boundary.crs != plane {
                return Err(GridProcessorError::invariant(format!(
                    "boundary '{}' is in {}, expected the grid plane {}",
                    boundary.region_name, boundary.crs, plane
                )));
            }
            if let Some(rect) = boundary.geometry.bounding_rect() {
                regions.push((rect, boundary.geometry.clone()));
            }
        }
        Ok(Self { regions })
    }

    /// Number of regions with a non-empty geometry.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}

impl Footprint for LandFootprint {
    fn covers(&self, x: f64, y: f64) -> bool {
        let coord = Coord { x, y };
        self.regions
            .iter()
            .any(|(rect, geometry)| rect.intersects(&coord) && geometry.intersects(&coord))
    }
}

/// Per-cell land flags for one grid.
#[derive(Debug, Clone, PartialEq)]
pub struct LandMask {
    ncols: usize,
    nrows: usize,
    land: Vec<bool>,
}

impl LandMask {
    /// Test every cell centre against the footprint, one row per task.
    pub fn build<F>(grid: &Grid, footprint: &F) -> Self
    where
        F: Footprint + ?Sized,
    {
        let (ncols, nrows) = (grid.ncols(), grid.nrows());
        let half = grid.resolution() / 2.0;
        let x_edges = grid.x_edges();
        let y_edges = grid.y_edges();

        let land: Vec<bool> = (0..nrows)
            .into_par_iter()
            .flat_map_iter(|row| {
                let y = y_edges[row] + half;
                (0..ncols).map(move |col| footprint.covers(x_edges[col] + half, y))
            })
            .collect();

        let mask = Self { ncols, nrows, land };
        debug!(land_cells = mask.land_cells(), total = ncols * nrows, "Built land mask");
        mask
    }

    /// Number of cells whose centre is on land.
    pub fn land_cells(&self) -> usize {
        self.land.iter().filter(|&&l| l).count()
    }

    /// Whether a cell (row-major index) is on land.
    pub fn is_land(&self, index: usize) -> bool {
        self.land.get(index).copied().unwrap_or(false)
    }

    /// Null out every off-land cell.
    pub fn apply<T: Clone>(&self, grid: &CellGrid<T>) -> Result<MaskedGrid<T>> {
        if grid.shape() != (self.ncols, self.nrows) {
            return Err(GridProcessorError::ShapeMismatch {
                expected: (self.ncols, self.nrows),
                actual: grid.shape(),
            });
        }
        Ok(grid.retain_where(|cell| self.is_land(cell.row * self.ncols + cell.col)))
    }
}
