//! Coordinate Reference System codes used by the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three CRS the pipeline knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsCode {
    /// WGS84 Geographic (lon/lat in degrees). Radar detections arrive in this.
    Epsg4326,
    /// NAD83 Geographic. Census boundary files declare this.
    Epsg4269,
    /// US National Atlas Equal Area (spherical Lambert azimuthal equal-area, meters)
    Epsg2163,
}

impl CrsCode {
    /// Parse a CRS identifier.
    ///
    /// Accepts formats like:
    /// - "EPSG:4326"
    /// - "epsg:4269"
    /// - "CRS:84" (equivalent to EPSG:4326)
    /// - "urn:ogc:def:crs:EPSG::4269" (legacy GeoJSON named CRS)
    /// - "urn:ogc:def:crs:OGC:1.3:CRS84"
    pub fn from_identifier(s: &str) -> Result<Self, CrsParseError> {
        let normalized = s.trim().to_uppercase();
        let code = normalized
            .strip_prefix("URN:OGC:DEF:CRS:")
            .map(|rest| rest.replace("::", ":"))
            .unwrap_or_else(|| normalized.clone());

        match code.as_str() {
            "EPSG:4326" | "CRS:84" | "OGC:1.3:CRS84" => Ok(CrsCode::Epsg4326),
            "EPSG:4269" => Ok(CrsCode::Epsg4269),
            "EPSG:2163" => Ok(CrsCode::Epsg2163),
            _ => Err(CrsParseError::UnsupportedCrs(s.to_string())),
        }
    }

    /// Check if this is a geographic (lon/lat) CRS.
    pub fn is_geographic(&self) -> bool {
        matches!(self, CrsCode::Epsg4326 | CrsCode::Epsg4269)
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            CrsCode::Epsg4326 => "EPSG:4326",
            CrsCode::Epsg4269 => "EPSG:4269",
            CrsCode::Epsg2163 => "EPSG:2163",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for CrsCode {
    type Err = CrsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_identifier(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crs() {
        assert_eq!(
            CrsCode::from_identifier("EPSG:4326").unwrap(),
            CrsCode::Epsg4326
        );
        assert_eq!(
            CrsCode::from_identifier("epsg:4269").unwrap(),
            CrsCode::Epsg4269
        );
        assert_eq!(
            CrsCode::from_identifier("CRS:84").unwrap(),
            CrsCode::Epsg4326
        );
        assert_eq!(
            CrsCode::from_identifier("urn:ogc:def:crs:EPSG::4269").unwrap(),
            CrsCode::Epsg4269
        );
        assert_eq!(
            CrsCode::from_identifier("urn:ogc:def:crs:OGC:1.3:CRS84").unwrap(),
            CrsCode::Epsg4326
        );
        assert!(CrsCode::from_identifier("EPSG:3857").is_err());
        // Ellipsoidal successor of 2163; its coordinates differ
        assert!(CrsCode::from_identifier("EPSG:9311").is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for code in [CrsCode::Epsg4326, CrsCode::Epsg4269, CrsCode::Epsg2163] {
            assert_eq!(code.to_string().parse::<CrsCode>().unwrap(), code);
        }
    }

    #[test]
    fn test_is_geographic() {
        assert!(CrsCode::Epsg4326.is_geographic());
        assert!(CrsCode::Epsg4269.is_geographic());
        assert!(!CrsCode::Epsg2163.is_geographic());
    }
}
