//! Common test fixtures for the hail pipeline.
//!
//! This module provides pre-defined inputs that exercise the cleaning rules
//! and small boundary layers with known geometry.

/// Common geographic extents for testing, as (min_lon, min_lat, max_lon, max_lat).
pub mod bbox {
    /// Contiguous United States
    pub const CONUS: (f64, f64, f64, f64) = (-125.0, 24.0, -66.5, 49.5);

    /// Southern plains (Oklahoma / north Texas), the hail maximum
    pub const SOUTHERN_PLAINS: (f64, f64, f64, f64) = (-103.0, 33.0, -94.5, 37.0);
}

/// A radar export in the NOAA SWDI `nx3hail` column layout.
///
/// Row by row: two kept detections on 12 June, a POSH sentinel, a POH of 80,
/// an unparseable timestamp, a kept January detection, and a detection whose
/// POSH is the sentinel while POH is 100.
pub const SWDI_CSV_SAMPLE: &str = "\
#ZTIME,LON,LAT,WSR_ID,CELL_ID,RANGE,AZIMUTH,SEVPROB,PROB,MAXSIZE
20150612234512,-97.51,35.47,KTLX,Q0,12,45,60,100,1.75
20150612235012,-97.40,35.50,KTLX,Q0,13,47,70,100,2.00
20150613001512,-97.30,35.60,KTLX,R1,15,50,-999,-999,0.00
20150613003012,-98.00,36.00,KVNX,S2,20,180,10,80,0.50
notatime,-97.00,35.00,KTLX,T3,10,90,50,100,1.00
20150101120000,-90.00,38.00,KLSX,U4,30,200,0,100,0.75
20150613010000,-97.20,35.65,KTLX,R1,16,51,-999,100,1.25
";

/// Expected cleaning outcome for [`SWDI_CSV_SAMPLE`].
pub mod swdi_sample {
    pub const ROWS: usize = 7;
    pub const KEPT: usize = 3;
    pub const DROPPED_SENTINEL: usize = 2;
    pub const DROPPED_LOW_PROBABILITY: usize = 1;
    pub const DROPPED_MALFORMED: usize = 1;
}

/// An axis-aligned lon/lat rectangle standing in for a state outline.
#[derive(Debug, Clone, Copy)]
pub struct SquareRegion {
    pub code: &'static str,
    pub name: &'static str,
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

/// Two contiguous states and one excluded territory.
pub const SAMPLE_REGIONS: [SquareRegion; 3] = [
    SquareRegion {
        code: "40",
        name: "Oklahoma",
        min_lon: -103.0,
        min_lat: 33.6,
        max_lon: -94.4,
        max_lat: 37.0,
    },
    SquareRegion {
        code: "20",
        name: "Kansas",
        min_lon: -102.05,
        min_lat: 37.0,
        max_lon: -94.6,
        max_lat: 40.0,
    },
    SquareRegion {
        code: "15",
        name: "Hawaii",
        min_lon: -160.3,
        min_lat: 18.9,
        max_lon: -154.8,
        max_lat: 22.2,
    },
];

/// Render regions as a GeoJSON FeatureCollection using census-style
/// property names (`STATEFP`, `NAME`).
pub fn square_regions_geojson(regions: &[SquareRegion]) -> String {
    let features: Vec<String> = regions
        .iter()
        .map(|r| {
            format!(
                r#"{{"type":"Feature","properties":{{"STATEFP":"{code}","NAME":"{name}"}},"geometry":{{"type":"Polygon","coordinates":[[[{x0},{y0}],[{x1},{y0}],[{x1},{y1}],[{x0},{y1}],[{x0},{y0}]]]}}}}"#,
                code = r.code,
                name = r.name,
                x0 = r.min_lon,
                y0 = r.min_lat,
                x1 = r.max_lon,
                y1 = r.max_lat,
            )
        })
        .collect();

    format!(
        r#"{{"type":"FeatureCollection","crs":{{"type":"name","properties":{{"name":"urn:ogc:def:crs:EPSG::4269"}}}},"features":[{}]}}"#,
        features.join(",")
    )
}
