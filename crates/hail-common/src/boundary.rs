//! Administrative boundary polygons.

use geo::{BoundingRect, MultiPolygon};

use crate::{BoundingBox, CrsCode};

/// Regions kept after loading: the 48 contiguous states plus DC.
pub const CONTIGUOUS_REGIONS: [&str; 49] = [
    "Alabama",
    "Arizona",
    "Arkansas",
    "California",
    "Colorado",
    "Connecticut",
    "Delaware",
    "District of Columbia",
    "Florida",
    "Georgia",
    "Idaho",
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Kentucky",
    "Louisiana",
    "Maine",
    "Maryland",
    "Massachusetts",
    "Michigan",
    "Minnesota",
    "Mississippi",
    "Missouri",
    "Montana",
    "Nebraska",
    "Nevada",
    "New Hampshire",
    "New Jersey",
    "New Mexico",
    "New York",
    "North Carolina",
    "North Dakota",
    "Ohio",
    "Oklahoma",
    "Oregon",
    "Pennsylvania",
    "Rhode Island",
    "South Carolina",
    "South Dakota",
    "Tennessee",
    "Texas",
    "Utah",
    "Vermont",
    "Virginia",
    "Washington",
    "West Virginia",
    "Wisconsin",
    "Wyoming",
];

/// Whether a region name is one of the contiguous regions (case-insensitive).
pub fn is_contiguous_region(name: &str) -> bool {
    let name = name.trim();
    CONTIGUOUS_REGIONS
        .iter()
        .any(|r| r.eq_ignore_ascii_case(name))
}

/// One administrative region and its outline.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPolygon {
    /// Region code (e.g. state FIPS "40")
    pub region_code: String,
    /// Region name (e.g. "Oklahoma")
    pub region_name: String,
    pub geometry: MultiPolygon<f64>,
    /// CRS the geometry coordinates are expressed in
    pub crs: CrsCode,
}

impl BoundaryPolygon {
    pub fn new(
        region_code: impl Into<String>,
        region_name: impl Into<String>,
        geometry: MultiPolygon<f64>,
        crs: CrsCode,
    ) -> Self {
        Self {
            region_code: region_code.into(),
            region_name: region_name.into(),
            geometry,
            crs,
        }
    }

    /// Bounding box of the geometry, `None` for an empty multipolygon.
    pub fn bbox(&self) -> Option<BoundingBox> {
        self.geometry.bounding_rect().map(BoundingBox::from)
    }

    /// Replace the geometry, keeping attributes. Used after reprojection.
    pub fn with_geometry(&self, geometry: MultiPolygon<f64>, crs: CrsCode) -> Self {
        Self {
            region_code: self.region_code.clone(),
            region_name: self.region_name.clone(),
            geometry,
            crs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};

    #[test]
    fn test_allow_list() {
        assert!(is_contiguous_region("Oklahoma"));
        assert!(is_contiguous_region("district of columbia"));
        for excluded in [
            "Alaska",
            "Hawaii",
            "Puerto Rico",
            "American Samoa",
            "United States Virgin Islands",
            "Commonwealth of the Northern Mariana Islands",
            "Guam",
        ] {
            assert!(!is_contiguous_region(excluded), "{} should be excluded", excluded);
        }
    }

    #[test]
    fn test_bbox() {
        let square = polygon![(x: -100.0, y: 35.0), (x: -98.0, y: 35.0), (x: -98.0, y: 37.0), (x: -100.0, y: 37.0)];
        let region = BoundaryPolygon::new("40", "Oklahoma", MultiPolygon(vec![square]), CrsCode::Epsg4269);
        assert_eq!(region.bbox(), Some(BoundingBox::new(-100.0, 35.0, -98.0, 37.0)));

        let empty = BoundaryPolygon::new("00", "Nowhere", MultiPolygon(vec![]), CrsCode::Epsg4269);
        assert_eq!(empty.bbox(), None);
    }
}
