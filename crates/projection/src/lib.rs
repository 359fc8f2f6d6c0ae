//! Coordinate reference system transformations.
//!
//! Implements the spherical Lambert azimuthal equal-area projection from
//! scratch, and applies any [`Reprojector`] to detections and boundaries.

pub mod laea;
pub mod transform;

use hail_common::CrsCode;
use thiserror::Error;

pub use laea::LambertAzimuthalEqualArea;
pub use transform::{reproject_boundaries, reproject_points, PointReprojection};

/// Errors raised by a projection.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectionError {
    /// Input coordinate is not finite or outside the valid lon/lat range.
    #[error("invalid coordinate ({x}, {y})")]
    InvalidCoordinate { x: f64, y: f64 },

    /// The point opposite the projection centre has no image.
    #[error("point ({lon}, {lat}) is antipodal to the projection centre")]
    Antipodal { lon: f64, lat: f64 },

    /// Planar point farther from the origin than the projection's disk.
    #[error("planar point ({x}, {y}) is outside the projection domain")]
    OutsideDomain { x: f64, y: f64 },

    /// A geometry was handed over in a CRS the projection does not accept.
    #[error("source CRS {actual} cannot be projected to {target}; expected a geographic CRS (EPSG:4269 or EPSG:4326)")]
    UnsupportedSourceCrs { actual: CrsCode, target: CrsCode },
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;

/// A forward/inverse map between a geographic CRS and a planar CRS.
///
/// Implementations must be pure: the same input always yields the same
/// output, with no state carried between calls.
pub trait Reprojector: Send + Sync {
    /// CRS of the target plane.
    fn target_crs(&self) -> CrsCode;

    /// Whether geometries in `crs` may be passed to [`Reprojector::forward`].
    fn accepts(&self, crs: CrsCode) -> bool {
        crs.is_geographic()
    }

    /// Geographic (lon, lat) in degrees to planar (x, y) in meters.
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64)>;

    /// Planar (x, y) in meters to geographic (lon, lat) in degrees.
    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)>;
}
