//! Integration tests for detection and boundary loading.

use std::collections::BTreeSet;
use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression as GzLevel;
use hail_common::{CrsCode, DayKey, Season};
use ingestion::{
    filter_observations, load_boundaries, load_observations, read_boundaries, read_observations,
    CleaningOptions, IngestionError,
};
use test_utils::{
    observation, square_regions_geojson, swdi_sample, testdata_file, SAMPLE_REGIONS,
    SWDI_CSV_SAMPLE,
};

#[test]
fn test_swdi_sample_counts() {
    let cleaned = read_observations(SWDI_CSV_SAMPLE.as_bytes(), &CleaningOptions::default()).unwrap();
    let report = cleaned.report;

    assert_eq!(report.rows_read, swdi_sample::ROWS);
    assert_eq!(report.kept, swdi_sample::KEPT);
    assert_eq!(report.dropped_sentinel, swdi_sample::DROPPED_SENTINEL);
    assert_eq!(report.dropped_low_probability, swdi_sample::DROPPED_LOW_PROBABILITY);
    assert_eq!(report.dropped_malformed, swdi_sample::DROPPED_MALFORMED);
    assert_eq!(report.dropped() + report.kept, report.rows_read);
}

#[test]
fn test_swdi_sample_fields() {
    let cleaned = read_observations(SWDI_CSV_SAMPLE.as_bytes(), &CleaningOptions::default()).unwrap();
    let sizes: Vec<f64> = cleaned.observations.iter().map(|o| o.max_size_in).collect();
    assert_eq!(sizes, vec![1.75, 2.00, 0.75]);

    let first = &cleaned.observations[0];
    assert_eq!(first.station_id, "KTLX");
    assert_eq!(first.cell_id, "Q0");
    assert_eq!(first.range_nmi, Some(12.0));
    assert_eq!(first.azimuth_deg, Some(45.0));
    assert_eq!((first.hour(), first.minute(), first.second()), (23, 45, 12));
    assert_eq!(first.season(), Season::Summer);
    assert_eq!(first.day_key(DayKey::MonthDay), 612);

    let january = &cleaned.observations[2];
    assert_eq!(january.season(), Season::Winter);
    assert_eq!(january.day_key(DayKey::CalendarDate), 20150101);
}

#[test]
fn test_lower_threshold_keeps_more_rows() {
    let options = CleaningOptions {
        min_hail_probability: 50,
    };
    let cleaned = read_observations(SWDI_CSV_SAMPLE.as_bytes(), &options).unwrap();
    assert_eq!(cleaned.report.kept, swdi_sample::KEPT + 1);
    assert_eq!(cleaned.report.dropped_low_probability, 0);
}

#[test]
fn test_kept_rows_satisfy_filter() {
    let path = testdata_file("ingestion", "nx3hail_sample.csv");
    let cleaned = load_observations(&path, &CleaningOptions::default()).unwrap();

    for obs in &cleaned.observations {
        assert!(obs.hail_probability >= 100);
        assert!(obs.severe_probability >= 0);
    }
}

#[test]
fn test_load_sample_file() {
    let path = testdata_file("ingestion", "nx3hail_sample.csv");
    let cleaned = load_observations(&path, &CleaningOptions::default()).unwrap();
    let report = cleaned.report;

    assert_eq!(report.rows_read, 20);
    assert_eq!(report.kept, 14);
    assert_eq!(report.dropped_sentinel, 2);
    assert_eq!(report.dropped_low_probability, 2);
    // One empty SEVPROB, one month 13
    assert_eq!(report.dropped_malformed, 2);

    let days: BTreeSet<u32> = cleaned
        .observations
        .iter()
        .map(|o| o.day_key(DayKey::MonthDay))
        .collect();
    assert_eq!(days.len(), 9);

    let seasons: BTreeSet<Season> = cleaned.observations.iter().map(|o| o.season()).collect();
    assert_eq!(seasons.len(), 4);
}

#[test]
fn test_gzip_input_matches_plain() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("detections.csv.gz");
    let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), GzLevel::default());
    encoder.write_all(SWDI_CSV_SAMPLE.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let zipped = load_observations(&path, &CleaningOptions::default()).unwrap();
    let plain = read_observations(SWDI_CSV_SAMPLE.as_bytes(), &CleaningOptions::default()).unwrap();
    assert_eq!(zipped.report, plain.report);
    assert_eq!(zipped.observations, plain.observations);
}

#[test]
fn test_missing_observation_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_observations(dir.path().join("absent.csv"), &CleaningOptions::default()).unwrap_err();
    assert!(matches!(err, IngestionError::MissingInput(_)));
}

#[test]
fn test_filter_in_memory_observations() {
    let kept = observation(6, 1, -97.0, 35.0, 1.0);
    let low = observation(6, 1, -97.0, 35.0, 1.0).with_probabilities(60, 10);
    let sentinel = observation(6, 1, -97.0, 35.0, 1.0).with_probabilities(100, -999);

    let cleaned = filter_observations(vec![kept.clone(), low, sentinel], &CleaningOptions::default());
    assert_eq!(cleaned.observations, vec![kept]);
    assert_eq!(cleaned.report.rows_read, 3);
    assert_eq!(cleaned.report.dropped_low_probability, 1);
    assert_eq!(cleaned.report.dropped_sentinel, 1);
}

#[test]
fn test_load_states_sample() {
    let load = load_boundaries(testdata_file("ingestion", "states_sample.geojson")).unwrap();

    let names: Vec<&str> = load.regions.iter().map(|r| r.region_name.as_str()).collect();
    assert_eq!(names, vec!["Oklahoma", "Kansas", "Michigan"]);
    assert_eq!(load.excluded, vec!["Hawaii".to_string(), "Puerto Rico".to_string()]);
    // District of Columbia has a null geometry
    assert_eq!(load.skipped, 1);

    let michigan = &load.regions[2];
    assert_eq!(michigan.region_code, "26");
    assert_eq!(michigan.geometry.0.len(), 2);
    assert!(load.regions.iter().all(|r| r.crs == CrsCode::Epsg4269));
}

#[test]
fn test_square_regions_fixture() {
    let json = square_regions_geojson(&SAMPLE_REGIONS);
    let load = read_boundaries(json.as_bytes()).unwrap();
    assert_eq!(load.regions.len(), 2);
    assert_eq!(load.excluded, vec!["Hawaii".to_string()]);

    let oklahoma = load.regions[0].bbox().unwrap();
    assert_eq!(oklahoma.min_x, -103.0);
    assert_eq!(oklahoma.max_y, 37.0);
}
