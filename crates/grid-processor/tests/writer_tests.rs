//! Tests for writing analysis outputs to disk.

use std::fs;

use geo::{polygon, MultiPolygon};
use grid_processor::{write_analysis, GridConfig, HailPipeline};
use hail_common::geojson::FeatureCollection;
use hail_common::{BoundaryPolygon, CrsCode};
use test_utils::observation;

fn oklahoma() -> BoundaryPolygon {
    let outline = polygon![(x: -103.0, y: 33.6), (x: -94.4, y: 33.6), (x: -94.4, y: 37.0), (x: -103.0, y: 37.0), (x: -103.0, y: 33.6)];
    BoundaryPolygon::new("40", "Oklahoma", MultiPolygon(vec![outline]), CrsCode::Epsg4269)
}

#[test]
fn test_write_all_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("run");

    let config = GridConfig {
        seasonal: true,
        ..Default::default()
    };
    let pipeline = HailPipeline::us_national_atlas(config).unwrap();
    let analysis = pipeline
        .run(
            vec![
                observation(5, 20, -97.5, 35.5, 1.75),
                observation(6, 2, -97.4, 35.6, 2.5),
            ],
            &[oklahoma()],
        )
        .unwrap();

    let outputs = write_analysis(&analysis, &out).unwrap();
    assert_eq!(outputs.rasters.len(), 10);
    assert!(outputs.all().all(|p| p.exists()));
    assert!(out.join("max_size.asc").exists());
    assert!(out.join("hail_days_summer.asc").exists());
    assert!(out.join("max_size_winter.asc").exists());

    let raster = fs::read_to_string(out.join("hail_days.asc")).unwrap();
    let mut lines = raster.lines();
    assert_eq!(
        lines.next().unwrap(),
        format!("ncols         {}", analysis.grid.ncols())
    );
    assert_eq!(raster.lines().count(), 6 + analysis.grid.nrows());
    let body: Vec<&str> = raster.lines().skip(6).collect();
    assert!(body
        .iter()
        .all(|row| row.split(' ').count() == analysis.grid.ncols()));

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&outputs.summary).unwrap()).unwrap();
    assert_eq!(summary["grid"]["crs"], "EPSG:2163");
    assert_eq!(summary["grid"]["ncols"], analysis.grid.ncols());
    assert_eq!(summary["day_key"], "month-day");
    assert_eq!(summary["diagnostics"]["assigned"], 2);
    assert_eq!(summary["layers"]["max_size"]["max"], 2.5);
    assert_eq!(summary["layers"]["hail_days_spring"]["cells_with_data"], 1);
    assert!(summary["layers"]["max_size_fall"]["max"].is_null());
    assert_eq!(summary["regions"][0], "Oklahoma");

    let boundaries: FeatureCollection =
        serde_json::from_str(&fs::read_to_string(&outputs.boundaries).unwrap()).unwrap();
    assert_eq!(boundaries.crs_name(), Some("EPSG:2163"));
    assert_eq!(boundaries.features.len(), 1);
}

#[test]
fn test_non_seasonal_writes_two_rasters() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = HailPipeline::us_national_atlas(GridConfig::default()).unwrap();
    let analysis = pipeline
        .run(vec![observation(5, 20, -97.5, 35.5, 1.0)], &[oklahoma()])
        .unwrap();

    let outputs = write_analysis(&analysis, dir.path()).unwrap();
    let names: Vec<String> = outputs
        .rasters
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["max_size.asc", "hail_days.asc"]);
}
