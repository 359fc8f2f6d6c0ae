//! Minimal GeoJSON types for boundary input and output.
//!
//! Only the polygonal subset is modelled. Other geometry types deserialize
//! to [`Geometry::Unsupported`] so a mixed file still loads.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A GeoJSON position. Only the first two ordinates are used.
pub type Position = Vec<f64>;

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    /// Legacy named CRS member (pre-RFC 7946 files).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<NamedCrs>,

    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Create a new empty FeatureCollection.
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            crs: None,
            features: Vec::new(),
        }
    }

    /// Declare the CRS of the coordinates.
    pub fn with_crs(mut self, name: impl Into<String>) -> Self {
        self.crs = Some(NamedCrs::new(name));
        self
    }

    /// Add multiple features to the collection.
    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features.extend(features);
        self
    }

    /// The declared CRS name, if any.
    pub fn crs_name(&self) -> Option<&str> {
        self.crs.as_ref().map(|c| c.properties.name.as_str())
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// `{"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::4269"}}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamedCrs {
    #[serde(rename = "type")]
    pub type_: String,
    pub properties: NamedCrsProperties,
}

impl NamedCrs {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            type_: "name".to_string(),
            properties: NamedCrsProperties { name: name.into() },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamedCrsProperties {
    pub name: String,
}

/// A GeoJSON Feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// Null geometries are allowed by GeoJSON.
    pub geometry: Option<Geometry>,

    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Feature {
    /// Create a feature from a geometry with no properties.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            type_: "Feature".to_string(),
            id: None,
            geometry: Some(geometry),
            properties: Map::new(),
        }
    }

    /// Set a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// First string-like property among `keys`. Numbers are stringified.
    pub fn property_str(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| match self.properties.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }
}

/// GeoJSON geometry types understood by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Array of linear rings (first is exterior, rest are holes).
    Polygon { coordinates: Vec<Vec<Position>> },

    /// Array of polygons.
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },

    /// Any other geometry type (Point, LineString, ...).
    #[serde(other)]
    Unsupported,
}

impl Geometry {
    /// Convert to a `geo` multipolygon.
    ///
    /// Returns an error message for unsupported types, positions with fewer
    /// than two ordinates, and polygons without an exterior ring.
    pub fn to_multi_polygon(&self) -> Result<MultiPolygon<f64>, String> {
        match self {
            Geometry::Polygon { coordinates } => {
                Ok(MultiPolygon(vec![polygon_from_rings(coordinates)?]))
            }
            Geometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .map(|rings| polygon_from_rings(rings))
                .collect::<Result<Vec<_>, _>>()
                .map(MultiPolygon),
            Geometry::Unsupported => Err("unsupported geometry type".to_string()),
        }
    }

    /// Build a MultiPolygon geometry from a `geo` multipolygon.
    pub fn from_multi_polygon(mp: &MultiPolygon<f64>) -> Self {
        let coordinates = mp
            .0
            .iter()
            .map(|polygon| {
                std::iter::once(polygon.exterior())
                    .chain(polygon.interiors())
                    .map(|ring| ring.coords().map(|c| vec![c.x, c.y]).collect())
                    .collect()
            })
            .collect();
        Geometry::MultiPolygon { coordinates }
    }
}

fn polygon_from_rings(rings: &[Vec<Position>]) -> Result<Polygon<f64>, String> {
    let mut rings = rings.iter().map(|ring| ring_from_positions(ring));
    let exterior = rings
        .next()
        .ok_or_else(|| "polygon has no exterior ring".to_string())??;
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn ring_from_positions(positions: &[Position]) -> Result<LineString<f64>, String> {
    positions
        .iter()
        .map(|p| match p.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(format!("position {:?} has fewer than two ordinates", p)),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::4269"}},
        "features": [
            {
                "type": "Feature",
                "properties": {"STATEFP": "40", "NAME": "Oklahoma"},
                "geometry": {"type": "Polygon", "coordinates": [[[-100, 35], [-98, 35], [-98, 37], [-100, 37], [-100, 35]]]}
            },
            {
                "type": "Feature",
                "properties": {"STATEFP": 99, "NAME": "Somewhere"},
                "geometry": {"type": "Point", "coordinates": [0, 0]}
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection() {
        let fc: FeatureCollection = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(fc.features.len(), 3);
        assert_eq!(fc.crs_name(), Some("urn:ogc:def:crs:EPSG::4269"));

        let first = &fc.features[0];
        assert_eq!(first.property_str(&["region_code", "STATEFP"]).as_deref(), Some("40"));
        let mp = first.geometry.as_ref().unwrap().to_multi_polygon().unwrap();
        assert_eq!(mp.0.len(), 1);
        assert_eq!(mp.0[0].exterior().0.len(), 5);

        assert_eq!(fc.features[1].geometry, Some(Geometry::Unsupported));
        assert_eq!(fc.features[1].property_str(&["STATEFP"]).as_deref(), Some("99"));
        assert!(fc.features[2].geometry.is_none());
    }

    #[test]
    fn test_short_position_rejected() {
        let geometry = Geometry::Polygon {
            coordinates: vec![vec![vec![1.0, 2.0], vec![3.0]]],
        };
        assert!(geometry.to_multi_polygon().is_err());
    }

    #[test]
    fn test_from_multi_polygon_keeps_rings() {
        let geometry = Geometry::Polygon {
            coordinates: vec![
                vec![vec![0.0, 0.0], vec![10.0, 0.0], vec![10.0, 10.0], vec![0.0, 10.0], vec![0.0, 0.0]],
                vec![vec![2.0, 2.0], vec![4.0, 2.0], vec![4.0, 4.0], vec![2.0, 2.0]],
            ],
        };
        let mp = geometry.to_multi_polygon().unwrap();
        match Geometry::from_multi_polygon(&mp) {
            Geometry::MultiPolygon { coordinates } => {
                assert_eq!(coordinates.len(), 1);
                assert_eq!(coordinates[0].len(), 2);
                assert_eq!(coordinates[0][1][1], vec![4.0, 2.0]);
            }
            other => panic!("expected MultiPolygon, got {:?}", other),
        }
    }
}
