//! Assignment of planar points to grid cells.
//!
//! Uses the floor rule: along each axis a value belongs to the cell whose
//! lower edge is the largest edge not exceeding it. The final edge only
//! closes the last cell, so a value sitting exactly on it still maps there.

use hail_common::PlanarPoint;
use tracing::{debug, warn};

use crate::grid::Grid;

/// Column/row address of a cell. Row 0 is the southernmost row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellIndex {
    pub col: usize,
    pub row: usize,
}

impl CellIndex {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// Index of the cell containing `value` along one axis.
///
/// `edges` must be strictly increasing with at least two values. Returns
/// `None` when `value` lies outside `[edges[0], edges[last]]` or is NaN.
///
/// # Example
///
/// ```
/// use grid_processor::floor_bucket;
///
/// let edges = [0.0, 10.0, 20.0, 30.0];
/// assert_eq!(floor_bucket(&edges, 9.999), Some(0));
/// assert_eq!(floor_bucket(&edges, 10.0), Some(1));
/// assert_eq!(floor_bucket(&edges, 30.0), Some(2));
/// assert_eq!(floor_bucket(&edges, 30.5), None);
/// ```
pub fn floor_bucket(edges: &[f64], value: f64) -> Option<usize> {
    let (&first, &last) = (edges.first()?, edges.last()?);
    if edges.len() < 2 || !(first..=last).contains(&value) {
        return None;
    }

    // Lower edges only; the final edge is the upper bound of the last cell
    let lower = &edges[..edges.len() - 1];
    lower.partition_point(|&e| e <= value).checked_sub(1)
}

/// A point and the cell it falls in.
#[derive(Debug, Clone, Copy)]
pub struct AssignedPoint<'a> {
    pub cell: CellIndex,
    pub point: &'a PlanarPoint,
}

/// Result of assigning a batch of points.
#[derive(Debug, Clone, Default)]
pub struct CellAssignment<'a> {
    /// Points inside the grid extent, in input order.
    pub assigned: Vec<AssignedPoint<'a>>,
    /// Points outside the extent (excluded).
    pub outside_extent: usize,
}

/// Assign every point to its cell.
///
/// Points outside the grid extent are excluded and counted; a warning is
/// logged when any are found.
pub fn assign_cells<'a>(grid: &Grid, points: &'a [PlanarPoint]) -> CellAssignment<'a> {
    let mut assignment = CellAssignment {
        assigned: Vec::with_capacity(points.len()),
        outside_extent: 0,
    };

    for point in points {
        match grid.locate(point.x, point.y) {
            Some(cell) => assignment.assigned.push(AssignedPoint { cell, point }),
            None => assignment.outside_extent += 1,
        }
    }

    if assignment.outside_extent > 0 {
        warn!(
            outside = assignment.outside_extent,
            total = points.len(),
            "Excluded detections outside the grid extent"
        );
    }
    debug!(assigned = assignment.assigned.len(), "Assigned detections to cells");

    assignment
}
