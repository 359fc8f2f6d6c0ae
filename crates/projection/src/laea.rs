//! Lambert Azimuthal Equal-Area projection (spherical form).
//!
//! Used here for the US National Atlas Equal Area CRS (EPSG:2163), which
//! centres the projection on 45°N, 100°W and uses the Clarke 1866
//! authalic sphere. Equal area means a 25 km × 25 km cell covers the same
//! ground area anywhere in the contiguous US.
//!
//! Forward equations (Snyder, Map Projections: A Working Manual, 24-2..24-4):
//!
//! ```text
//! k' = sqrt(2 / (1 + sin φ0 sin φ + cos φ0 cos φ cos(λ - λ0)))
//! x  = R k' cos φ sin(λ - λ0)
//! y  = R k' (cos φ0 sin φ - sin φ0 cos φ cos(λ - λ0))
//! ```

use std::f64::consts::PI;

use hail_common::CrsCode;

use crate::{ProjectionError, Reprojector, Result};

/// Radius of the sphere used by EPSG:2163 (meters).
pub const US_NATIONAL_ATLAS_RADIUS: f64 = 6_370_997.0;

/// Spherical Lambert azimuthal equal-area projection parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LambertAzimuthalEqualArea {
    /// Latitude of the projection centre in radians
    pub lat0: f64,
    /// Longitude of the projection centre in radians
    pub lon0: f64,
    /// Sphere radius (meters)
    pub radius: f64,
    sin_lat0: f64,
    cos_lat0: f64,
}

impl LambertAzimuthalEqualArea {
    /// Create a projection centred on (`lat0_deg`, `lon0_deg`).
    pub fn new(lat0_deg: f64, lon0_deg: f64, radius: f64) -> Self {
        let lat0 = lat0_deg.to_radians();
        let lon0 = lon0_deg.to_radians();
        let (sin_lat0, cos_lat0) = lat0.sin_cos();

        Self {
            lat0,
            lon0,
            radius,
            sin_lat0,
            cos_lat0,
        }
    }

    /// US National Atlas Equal Area (EPSG:2163).
    ///
    /// - Centre: 45°N, 100°W
    /// - Sphere radius: 6,370,997 m
    /// - No false easting/northing
    pub fn us_national_atlas() -> Self {
        Self::new(45.0, -100.0, US_NATIONAL_ATLAS_RADIUS)
    }
}

/// Largest longitude magnitude accepted by [`Reprojector::forward`] (degrees).
pub const MAX_LONGITUDE_DEG: f64 = 360.0;

/// Wrap a longitude difference into [-π, π].
fn wrap_pi(angle: f64) -> f64 {
    if (-PI..=PI).contains(&angle) {
        angle
    } else {
        (angle + PI).rem_euclid(2.0 * PI) - PI
    }
}

impl Reprojector for LambertAzimuthalEqualArea {
    fn target_crs(&self) -> CrsCode {
        CrsCode::Epsg2163
    }

    fn forward(&self, lon_deg: f64, lat_deg: f64) -> Result<(f64, f64)> {
        if !lon_deg.is_finite()
            || !lat_deg.is_finite()
            || lon_deg.abs() > MAX_LONGITUDE_DEG
            || lat_deg.abs() > 90.0
        {
            return Err(ProjectionError::InvalidCoordinate {
                x: lon_deg,
                y: lat_deg,
            });
        }

        let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
        let (sin_dlon, cos_dlon) = wrap_pi(lon_deg.to_radians() - self.lon0).sin_cos();

        let denom = 1.0 + self.sin_lat0 * sin_lat + self.cos_lat0 * cos_lat * cos_dlon;
        if denom <= 1e-12 {
            return Err(ProjectionError::Antipodal {
                lon: lon_deg,
                lat: lat_deg,
            });
        }

        let k = (2.0 / denom).sqrt();
        let x = self.radius * k * cos_lat * sin_dlon;
        let y = self.radius * k * (self.cos_lat0 * sin_lat - self.sin_lat0 * cos_lat * cos_dlon);

        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::InvalidCoordinate { x, y });
        }

        let rho = x.hypot(y);
        if rho < 1e-9 {
            return Ok((self.lon0.to_degrees(), self.lat0.to_degrees()));
        }

        let ratio = rho / (2.0 * self.radius);
        if ratio > 1.0 + 1e-12 {
            return Err(ProjectionError::OutsideDomain { x, y });
        }

        // Angular distance from the centre
        let c = 2.0 * ratio.min(1.0).asin();
        let (sin_c, cos_c) = c.sin_cos();

        let lat = (cos_c * self.sin_lat0 + y * sin_c * self.cos_lat0 / rho)
            .clamp(-1.0, 1.0)
            .asin();
        let lon = self.lon0
            + (x * sin_c).atan2(rho * self.cos_lat0 * cos_c - y * self.sin_lat0 * sin_c);

        Ok((wrap_pi(lon).to_degrees(), lat.to_degrees()))
    }
}
