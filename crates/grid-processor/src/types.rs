//! Core types for gridded results.

use serde::Serialize;

use crate::assign::CellIndex;
use crate::error::{GridProcessorError, Result};

/// One optional value per grid cell.
///
/// Values are stored row-major with row 0 the southernmost row; `None`
/// means no data.
#[derive(Debug, Clone, PartialEq)]
pub struct CellGrid<T> {
    ncols: usize,
    nrows: usize,
    data: Vec<Option<T>>,
}

/// A cell grid after land masking: off-land cells are `None`.
pub type MaskedGrid<T> = CellGrid<T>;

impl<T> CellGrid<T> {
    /// A grid with no data in any cell.
    pub fn empty(ncols: usize, nrows: usize) -> Self {
        Self {
            ncols,
            nrows,
            data: std::iter::repeat_with(|| None).take(ncols * nrows).collect(),
        }
    }

    /// Wrap row-major values (south row first).
    pub fn from_vec(ncols: usize, nrows: usize, data: Vec<Option<T>>) -> Result<Self> {
        if data.len() != ncols * nrows {
            return Err(GridProcessorError::ShapeMismatch {
                expected: (ncols, nrows),
                actual: (data.len(), 1),
            });
        }
        Ok(Self { ncols, nrows, data })
    }

    /// Wrap values already known to match the shape.
    pub(crate) fn from_parts(ncols: usize, nrows: usize, data: Vec<Option<T>>) -> Self {
        debug_assert_eq!(data.len(), ncols * nrows);
        Self { ncols, nrows, data }
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// (ncols, nrows)
    pub fn shape(&self) -> (usize, usize) {
        (self.ncols, self.nrows)
    }

    /// Value of a cell, `None` for no data or an out-of-range index.
    pub fn get(&self, cell: CellIndex) -> Option<&T> {
        if cell.col >= self.ncols || cell.row >= self.nrows {
            return None;
        }
        self.data[cell.row * self.ncols + cell.col].as_ref()
    }

    /// Set a cell's value. Out-of-range indices are ignored.
    pub fn set(&mut self, cell: CellIndex, value: Option<T>) {
        if cell.col < self.ncols && cell.row < self.nrows {
            self.data[cell.row * self.ncols + cell.col] = value;
        }
    }

    /// Raw values, south row first.
    pub fn values(&self) -> &[Option<T>] {
        &self.data
    }

    /// Rows from north to south, as raster formats expect.
    pub fn rows_north_first(&self) -> impl Iterator<Item = &[Option<T>]> + '_ {
        self.data.chunks(self.ncols.max(1)).rev()
    }

    /// Number of cells holding a value.
    pub fn cells_with_data(&self) -> usize {
        self.data.iter().filter(|v| v.is_some()).count()
    }

    /// Cells holding a value, with their index.
    pub fn iter_data(&self) -> impl Iterator<Item = (CellIndex, &T)> + '_ {
        let ncols = self.ncols;
        self.data.iter().enumerate().filter_map(move |(i, v)| {
            v.as_ref().map(|v| (CellIndex::new(i % ncols, i / ncols), v))
        })
    }

    /// Keep values only where `keep` is true for the cell.
    pub fn retain_where<F>(&self, mut keep: F) -> Self
    where
        T: Clone,
        F: FnMut(CellIndex) -> bool,
    {
        let ncols = self.ncols;
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(i, v)| match v {
                Some(v) if keep(CellIndex::new(i % ncols, i / ncols)) => Some(v.clone()),
                _ => None,
            })
            .collect();

        Self {
            ncols: self.ncols,
            nrows: self.nrows,
            data,
        }
    }
}

impl<T: Copy + Into<f64>> CellGrid<T> {
    /// Summary statistics over the cells holding data.
    pub fn stats(&self) -> LayerStats {
        let mut stats = LayerStats {
            cells_with_data: 0,
            min: None,
            max: None,
        };

        for value in self.data.iter().flatten() {
            let v: f64 = (*value).into();
            stats.cells_with_data += 1;
            stats.min = Some(stats.min.map_or(v, |m: f64| m.min(v)));
            stats.max = Some(stats.max.map_or(v, |m: f64| m.max(v)));
        }

        stats
    }
}

/// Summary of one output layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerStats {
    pub cells_with_data: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
}
