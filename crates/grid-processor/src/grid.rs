//! Regular square-cell grid over the planar boundary extent.

use hail_common::BoundingBox;
use tracing::debug;

use crate::assign::{floor_bucket, CellIndex};
use crate::config::ExtentOverride;
use crate::error::{GridProcessorError, Result};

/// A regular grid in the equal-area plane.
///
/// Cell `(col, row)` covers `[x_edges[col], x_edges[col + 1])` by
/// `[y_edges[row], y_edges[row + 1])`; row 0 is the southernmost row.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    resolution: f64,
    x_edges: Vec<f64>,
    y_edges: Vec<f64>,
}

/// Build `min + i * resolution` for `i` in `0..=count`, extending until the
/// last edge reaches `max`.
fn build_edges(min: f64, max: f64, resolution: f64, count: usize) -> Vec<f64> {
    let mut edges: Vec<f64> = (0..=count).map(|i| min + i as f64 * resolution).collect();
    while edges.last().is_some_and(|&last| last < max) {
        edges.push(min + edges.len() as f64 * resolution);
    }
    edges
}

/// Extent along one axis: the span, or the override rounded up to a
/// multiple of the resolution.
fn axis_extent(axis: &str, span: f64, requested: Option<f64>, resolution: f64) -> Result<f64> {
    let extent = match requested {
        Some(requested) if requested < span => {
            return Err(GridProcessorError::config(format!(
                "extent {} {} m is smaller than the boundary span {} m",
                axis, requested, span
            )));
        }
        Some(requested) => (requested / resolution).ceil() * resolution,
        None => span,
    };

    if resolution > extent {
        return Err(GridProcessorError::config(format!(
            "resolution {} m exceeds the grid {} of {} m",
            resolution, axis, extent
        )));
    }
    Ok(extent)
}

impl Grid {
    /// Build the grid covering `bbox`.
    ///
    /// # Arguments
    /// * `bbox` - Planar bounding box of the boundaries (meters)
    /// * `resolution` - Cell edge length (meters)
    /// * `extent` - Optional fixed width/height; each must be at least the
    ///   bbox span and is rounded up to a multiple of `resolution`
    ///
    /// # Errors
    /// A configuration error for a non-positive resolution, a degenerate
    /// bbox, an override smaller than the span, or a resolution larger than
    /// the extent.
    pub fn build(bbox: &BoundingBox, resolution: f64, extent: Option<ExtentOverride>) -> Result<Self> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(GridProcessorError::config(format!(
                "resolution must be a positive number of meters, got {}",
                resolution
            )));
        }
        if !bbox.is_valid() {
            return Err(GridProcessorError::config(format!(
                "cannot build a grid over degenerate extent {:?}",
                bbox
            )));
        }

        let width = axis_extent("width", bbox.width(), extent.map(|e| e.width_m), resolution)?;
        let height = axis_extent("height", bbox.height(), extent.map(|e| e.height_m), resolution)?;

        let ncols = (width / resolution).ceil() as usize;
        let nrows = (height / resolution).ceil() as usize;

        let grid = Self {
            resolution,
            x_edges: build_edges(bbox.min_x, bbox.max_x, resolution, ncols),
            y_edges: build_edges(bbox.min_y, bbox.max_y, resolution, nrows),
        };

        debug!(
            ncols = grid.ncols(),
            nrows = grid.nrows(),
            resolution,
            origin_x = bbox.min_x,
            origin_y = bbox.min_y,
            "Built grid"
        );

        Ok(grid)
    }

    /// Cell edge length in meters.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.x_edges.len() - 1
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.y_edges.len() - 1
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.ncols() * self.nrows()
    }

    /// Column edges, west to east (`ncols + 1` values).
    pub fn x_edges(&self) -> &[f64] {
        &self.x_edges
    }

    /// Row edges, south to north (`nrows + 1` values).
    pub fn y_edges(&self) -> &[f64] {
        &self.y_edges
    }

    /// Lower-left corner of the grid.
    pub fn origin(&self) -> (f64, f64) {
        (self.x_edges[0], self.y_edges[0])
    }

    /// Area covered by the grid (first to last edge on each axis).
    pub fn extent(&self) -> BoundingBox {
        let (min_x, min_y) = self.origin();
        BoundingBox::new(
            min_x,
            min_y,
            self.x_edges[self.x_edges.len() - 1],
            self.y_edges[self.y_edges.len() - 1],
        )
    }

    /// Centre of a cell.
    pub fn cell_center(&self, cell: CellIndex) -> (f64, f64) {
        let half = self.resolution / 2.0;
        (self.x_edges[cell.col] + half, self.y_edges[cell.row] + half)
    }

    /// Bounds of a cell.
    pub fn cell_bounds(&self, cell: CellIndex) -> BoundingBox {
        BoundingBox::new(
            self.x_edges[cell.col],
            self.y_edges[cell.row],
            self.x_edges[cell.col + 1],
            self.y_edges[cell.row + 1],
        )
    }

    /// Row-major index (south row first) of a cell.
    pub fn flat_index(&self, cell: CellIndex) -> usize {
        cell.row * self.ncols() + cell.col
    }

    /// Inverse of [`Grid::flat_index`].
    pub fn cell_at(&self, index: usize) -> CellIndex {
        CellIndex::new(index % self.ncols(), index / self.ncols())
    }

    /// Cell containing a planar point, `None` outside the extent.
    pub fn locate(&self, x: f64, y: f64) -> Option<CellIndex> {
        Some(CellIndex::new(
            floor_bucket(&self.x_edges, x)?,
            floor_bucket(&self.y_edges, y)?,
        ))
    }

    /// Every cell, south row first.
    pub fn cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        (0..self.cell_count()).map(move |i| self.cell_at(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strictly_increasing(edges: &[f64]) -> bool {
        edges.windows(2).all(|w| w[0] < w[1])
    }

    #[test]
    fn test_exact_span() {
        let bbox = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
        let grid = Grid::build(&bbox, 10.0, None).unwrap();
        assert_eq!(grid.ncols(), 10);
        assert_eq!(grid.nrows(), 5);
        assert_eq!(grid.x_edges().len(), 11);
        assert_eq!(grid.y_edges()[5], 50.0);
    }

    #[test]
    fn test_partial_cell_rounds_up() {
        let bbox = BoundingBox::new(-35.0, 2.0, 0.0, 12.5);
        let grid = Grid::build(&bbox, 10.0, None).unwrap();
        assert_eq!(grid.ncols(), 4);
        assert_eq!(grid.nrows(), 2);
        assert_eq!(grid.x_edges(), &[-35.0, -25.0, -15.0, -5.0, 5.0]);
        assert!(grid.extent().contains_point(bbox.max_x, bbox.max_y));
    }

    #[test]
    fn test_edges_cover_bbox_and_increase() {
        let bbox = BoundingBox::new(-2_356_114.0, -1_338_997.0, 2_258_154.0, 1_558_946.0);
        let grid = Grid::build(&bbox, 25_000.0, None).unwrap();
        assert!(strictly_increasing(grid.x_edges()));
        assert!(strictly_increasing(grid.y_edges()));
        assert!(*grid.x_edges().last().unwrap() >= bbox.max_x);
        assert!(*grid.y_edges().last().unwrap() >= bbox.max_y);
        assert_eq!(grid.origin(), (bbox.min_x, bbox.min_y));
    }

    #[test]
    fn test_extent_override_rounded_to_resolution() {
        let bbox = BoundingBox::new(0.0, 0.0, 95.0, 40.0);
        let grid = Grid::build(&bbox, 10.0, Some(ExtentOverride::new(101.0, 40.0))).unwrap();
        assert_eq!(grid.ncols(), 11);
        assert_eq!(grid.nrows(), 4);
        assert_eq!(grid.extent().max_x, 110.0);
    }

    #[test]
    fn test_override_smaller_than_span() {
        let bbox = BoundingBox::new(0.0, 0.0, 95.0, 40.0);
        let err = Grid::build(&bbox, 10.0, Some(ExtentOverride::new(90.0, 40.0))).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_invalid_configurations() {
        let bbox = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
        assert!(Grid::build(&bbox, 0.0, None).unwrap_err().is_configuration());
        assert!(Grid::build(&bbox, -5.0, None).unwrap_err().is_configuration());
        assert!(Grid::build(&bbox, f64::NAN, None).unwrap_err().is_configuration());
        // Resolution larger than the 50 m height
        assert!(Grid::build(&bbox, 60.0, None).unwrap_err().is_configuration());

        let flat = BoundingBox::new(0.0, 0.0, 100.0, 0.0);
        assert!(Grid::build(&flat, 10.0, None).unwrap_err().is_configuration());
    }

    #[test]
    fn test_cell_geometry() {
        let bbox = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
        let grid = Grid::build(&bbox, 10.0, None).unwrap();
        let cell = CellIndex::new(3, 2);

        assert_eq!(grid.cell_center(cell), (35.0, 25.0));
        assert_eq!(grid.cell_bounds(cell), BoundingBox::new(30.0, 20.0, 40.0, 30.0));
        assert_eq!(grid.flat_index(cell), 23);
        assert_eq!(grid.cell_at(23), cell);
        assert_eq!(grid.cells().count(), 50);
    }

    #[test]
    fn test_locate() {
        let bbox = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
        let grid = Grid::build(&bbox, 10.0, None).unwrap();
        assert_eq!(grid.locate(0.0, 0.0), Some(CellIndex::new(0, 0)));
        assert_eq!(grid.locate(100.0, 50.0), Some(CellIndex::new(9, 4)));
        assert_eq!(grid.locate(55.5, 19.99), Some(CellIndex::new(5, 1)));
        assert_eq!(grid.locate(-0.1, 10.0), None);
        assert_eq!(grid.locate(10.0, 50.1), None);
    }
}
