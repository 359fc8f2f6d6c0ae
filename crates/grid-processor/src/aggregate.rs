//! Per-cell reduction of assigned detections.
//!
//! Each cell keeps the largest hail size seen and the set of distinct day
//! keys. Both reductions are commutative and associative, so the points are
//! folded in parallel partitions and merged; the result does not depend on
//! input order or thread count.

use std::collections::{BTreeMap, BTreeSet};

use hail_common::{DayKey, Season};
use rayon::prelude::*;
use tracing::debug;

use crate::assign::AssignedPoint;
use crate::grid::Grid;
use crate::types::CellGrid;

/// Smallest partition handed to a rayon task.
const MIN_CHUNK: usize = 4096;

/// Running reduction for one cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellAccumulator {
    max_size: Option<f64>,
    days: BTreeSet<u32>,
}

impl CellAccumulator {
    /// Fold one detection into the cell. NaN sizes still count the day.
    pub fn observe(&mut self, size: f64, day: u32) {
        self.days.insert(day);
        if size.is_nan() {
            return;
        }
        self.max_size = Some(match self.max_size {
            Some(current) if current.total_cmp(&size).is_ge() => current,
            _ => size,
        });
    }

    /// Combine with another partition's accumulator for the same cell.
    pub fn merge(&mut self, other: CellAccumulator) {
        if let Some(size) = other.max_size {
            self.max_size = Some(match self.max_size {
                Some(current) if current.total_cmp(&size).is_ge() => current,
                _ => size,
            });
        }
        self.days.extend(other.days);
    }

    /// Largest size seen, `None` when the cell is empty.
    pub fn max_size(&self) -> Option<f64> {
        self.max_size
    }

    /// Number of distinct hail days, `None` when the cell is empty.
    pub fn day_count(&self) -> Option<u32> {
        if self.days.is_empty() {
            None
        } else {
            Some(self.days.len() as u32)
        }
    }

    pub fn days(&self) -> &BTreeSet<u32> {
        &self.days
    }
}

/// Accumulators for the cells that received at least one detection.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    ncols: usize,
    nrows: usize,
    cells: BTreeMap<usize, CellAccumulator>,
}

impl Aggregation {
    fn empty(ncols: usize, nrows: usize) -> Self {
        Self {
            ncols,
            nrows,
            cells: BTreeMap::new(),
        }
    }

    fn fold_chunk(mut self, points: &[AssignedPoint<'_>], day_key: DayKey) -> Self {
        for assigned in points {
            let index = assigned.cell.row * self.ncols + assigned.cell.col;
            let obs = &assigned.point.observation;
            self.cells
                .entry(index)
                .or_default()
                .observe(obs.max_size_in, obs.day_key(day_key));
        }
        self
    }

    fn merge(mut self, other: Self) -> Self {
        for (index, acc) in other.cells {
            self.cells.entry(index).or_default().merge(acc);
        }
        self
    }

    /// Number of cells with at least one detection.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Accumulator of a cell by row-major index.
    pub fn cell(&self, index: usize) -> Option<&CellAccumulator> {
        self.cells.get(&index)
    }

    fn layer<T, F>(&self, value: F) -> CellGrid<T>
    where
        F: Fn(&CellAccumulator) -> Option<T>,
    {
        let mut data: Vec<Option<T>> = std::iter::repeat_with(|| None)
            .take(self.ncols * self.nrows)
            .collect();
        for (&index, acc) in &self.cells {
            data[index] = value(acc);
        }
        CellGrid::from_parts(self.ncols, self.nrows, data)
    }

    /// Maximum hail size per cell (inches).
    pub fn max_size_grid(&self) -> CellGrid<f64> {
        self.layer(CellAccumulator::max_size)
    }

    /// Distinct hail days per cell.
    pub fn hail_day_grid(&self) -> CellGrid<u32> {
        self.layer(CellAccumulator::day_count)
    }
}

/// Reduce assigned points to per-cell accumulators.
pub fn aggregate(grid: &Grid, points: &[AssignedPoint<'_>], day_key: DayKey) -> Aggregation {
    let (ncols, nrows) = (grid.ncols(), grid.nrows());
    let chunk_size = (points.len() / rayon::current_num_threads()).max(MIN_CHUNK);

    let aggregation = points
        .par_chunks(chunk_size)
        .map(|chunk| Aggregation::empty(ncols, nrows).fold_chunk(chunk, day_key))
        .reduce(|| Aggregation::empty(ncols, nrows), Aggregation::merge);

    debug!(
        points = points.len(),
        occupied_cells = aggregation.occupied_cells(),
        "Aggregated detections"
    );

    aggregation
}

/// Reduce assigned points separately for each season.
///
/// Every season is present in the result, empty or not.
pub fn aggregate_by_season(
    grid: &Grid,
    points: &[AssignedPoint<'_>],
    day_key: DayKey,
) -> BTreeMap<Season, Aggregation> {
    Season::ALL
        .iter()
        .map(|&season| {
            let in_season: Vec<AssignedPoint<'_>> = points
                .iter()
                .filter(|p| p.point.observation.season() == season)
                .copied()
                .collect();
            (season, aggregate(grid, &in_season, day_key))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::{assign_cells, CellIndex};
    use hail_common::{BoundingBox, PlanarPoint};
    use test_utils::planar_point;

    fn grid() -> Grid {
        Grid::build(&BoundingBox::new(0.0, 0.0, 30.0, 30.0), 10.0, None).unwrap()
    }

    #[test]
    fn test_accumulator_day_count_idempotent() {
        let mut acc = CellAccumulator::default();
        assert_eq!(acc.max_size(), None);
        assert_eq!(acc.day_count(), None);

        acc.observe(1.0, 505);
        acc.observe(2.0, 505);
        acc.observe(0.5, 506);
        assert_eq!(acc.max_size(), Some(2.0));
        assert_eq!(acc.day_count(), Some(2));
    }

    #[test]
    fn test_accumulator_ignores_nan_size() {
        let mut acc = CellAccumulator::default();
        acc.observe(f64::NAN, 101);
        assert_eq!(acc.max_size(), None);
        assert_eq!(acc.day_count(), Some(1));

        acc.observe(0.75, 102);
        acc.observe(f64::NAN, 103);
        assert_eq!(acc.max_size(), Some(0.75));
    }

    #[test]
    fn test_merge_matches_sequential() {
        let mut a = CellAccumulator::default();
        a.observe(1.0, 1);
        a.observe(3.0, 2);
        let mut b = CellAccumulator::default();
        b.observe(2.0, 2);
        b.observe(0.5, 3);

        let mut sequential = CellAccumulator::default();
        for (size, day) in [(1.0, 1), (3.0, 2), (2.0, 2), (0.5, 3)] {
            sequential.observe(size, day);
        }

        a.merge(b);
        assert_eq!(a, sequential);
    }

    #[test]
    fn test_single_cell_example() {
        let grid = grid();
        let points = vec![
            planar_point(12.0, 12.0, 6, 5, 1.0),
            planar_point(13.0, 14.0, 6, 5, 2.0),
            planar_point(18.0, 11.0, 6, 6, 0.5),
        ];
        let assignment = assign_cells(&grid, &points);
        let aggregation = aggregate(&grid, &assignment.assigned, DayKey::MonthDay);

        let cell = CellIndex::new(1, 1);
        assert_eq!(aggregation.hail_day_grid().get(cell), Some(&2));
        assert_eq!(aggregation.max_size_grid().get(cell), Some(&2.0));
        assert_eq!(aggregation.occupied_cells(), 1);
        assert_eq!(aggregation.max_size_grid().cells_with_data(), 1);
    }

    #[test]
    fn test_empty_input() {
        let grid = grid();
        let aggregation = aggregate(&grid, &[], DayKey::MonthDay);
        assert_eq!(aggregation.occupied_cells(), 0);
        assert_eq!(aggregation.max_size_grid().shape(), (3, 3));
    }

    #[test]
    fn test_calendar_date_keeps_years_apart() {
        let grid = grid();
        let mut later = planar_point(5.0, 5.0, 7, 4, 1.0);
        later.observation.timestamp = test_utils::timestamp(2016, 7, 4);
        let points = vec![planar_point(5.0, 5.0, 7, 4, 1.0), later];
        let assignment = assign_cells(&grid, &points);

        let by_month_day = aggregate(&grid, &assignment.assigned, DayKey::MonthDay);
        let by_date = aggregate(&grid, &assignment.assigned, DayKey::CalendarDate);
        let cell = CellIndex::new(0, 0);
        assert_eq!(by_month_day.hail_day_grid().get(cell), Some(&1));
        assert_eq!(by_date.hail_day_grid().get(cell), Some(&2));
    }

    #[test]
    fn test_by_season() {
        let grid = grid();
        let points = vec![
            planar_point(5.0, 5.0, 1, 10, 1.0),
            planar_point(5.0, 5.0, 7, 10, 2.5),
            planar_point(25.0, 25.0, 7, 11, 1.5),
        ];
        let assignment = assign_cells(&grid, &points);
        let seasons = aggregate_by_season(&grid, &assignment.assigned, DayKey::MonthDay);

        assert_eq!(seasons.len(), 4);
        assert_eq!(seasons[&Season::Winter].occupied_cells(), 1);
        assert_eq!(seasons[&Season::Summer].occupied_cells(), 2);
        assert_eq!(seasons[&Season::Spring].occupied_cells(), 0);
        assert_eq!(
            seasons[&Season::Summer].max_size_grid().get(CellIndex::new(0, 0)),
            Some(&2.5)
        );
    }

    #[test]
    fn test_large_input_spans_partitions() {
        let grid = grid();
        let points: Vec<PlanarPoint> = (0..20_000)
            .map(|i| planar_point((i % 30) as f64, (i % 29) as f64, 1 + (i % 12) as u32, 1 + (i % 28) as u32, (i % 17) as f64 * 0.25))
            .collect();
        let assignment = assign_cells(&grid, &points);

        let parallel = aggregate(&grid, &assignment.assigned, DayKey::MonthDay);
        let sequential = Aggregation::empty(3, 3).fold_chunk(&assignment.assigned, DayKey::MonthDay);
        assert_eq!(parallel, sequential);
    }
}
