//! ESRI ASCII raster writer.
//!
//! Layout:
//!
//! ```text
//! ncols         182
//! nrows         114
//! xllcorner     -2356114
//! yllcorner     -1338997
//! cellsize      25000
//! NODATA_value  -9999
//! <row nrows-1: northernmost>
//! ...
//! <row 0: southernmost>
//! ```

use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{GridProcessorError, Result};
use crate::grid::Grid;
use crate::types::CellGrid;

/// Value written for cells without data.
pub const NODATA_VALUE: i32 = -9999;

/// Write a layer as an ESRI ASCII raster.
pub fn write_ascii_grid<W, T>(writer: &mut W, grid: &Grid, layer: &CellGrid<T>) -> Result<()>
where
    W: Write,
    T: Display,
{
    if layer.shape() != (grid.ncols(), grid.nrows()) {
        return Err(GridProcessorError::ShapeMismatch {
            expected: (grid.ncols(), grid.nrows()),
            actual: layer.shape(),
        });
    }

    let (xll, yll) = grid.origin();
    writeln!(writer, "ncols         {}", grid.ncols())?;
    writeln!(writer, "nrows         {}", grid.nrows())?;
    writeln!(writer, "xllcorner     {}", xll)?;
    writeln!(writer, "yllcorner     {}", yll)?;
    writeln!(writer, "cellsize      {}", grid.resolution())?;
    writeln!(writer, "NODATA_value  {}", NODATA_VALUE)?;

    for row in layer.rows_north_first() {
        let mut first = true;
        for value in row {
            if !first {
                writer.write_all(b" ")?;
            }
            first = false;
            match value {
                Some(v) => write!(writer, "{}", v)?,
                None => write!(writer, "{}", NODATA_VALUE)?,
            }
        }
        writer.write_all(b"\n")?;
    }

    Ok(())
}

/// Write a layer to a `.asc` file.
pub fn write_ascii_grid_file<T: Display>(path: &Path, grid: &Grid, layer: &CellGrid<T>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_ascii_grid(&mut writer, grid, layer)?;
    writer.flush()?;
    debug!(path = %path.display(), cells = layer.cells_with_data(), "Wrote ASCII grid");
    Ok(())
}
