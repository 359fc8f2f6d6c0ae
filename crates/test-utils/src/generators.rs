//! Generators for synthetic detections with predictable attributes.

use chrono::{NaiveDate, NaiveDateTime};
use hail_common::{Observation, PlanarPoint};

/// Noon UTC on the given date.
///
/// # Panics
///
/// Panics on an invalid calendar date; callers are tests.
pub fn timestamp(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap_or_else(|| panic!("invalid test date {}-{}-{}", year, month, day))
}

/// A kept (POH 100) detection in 2015.
pub fn observation(month: u32, day: u32, lon: f64, lat: f64, size: f64) -> Observation {
    Observation::new(timestamp(2015, month, day), lon, lat, size)
        .expect("valid month")
        .with_station("KTLX")
}

/// A detection already placed on the plane at (x, y).
pub fn planar_point(x: f64, y: f64, month: u32, day: u32, size: f64) -> PlanarPoint {
    PlanarPoint::new(observation(month, day, -100.0, 45.0, size), x, y)
}

/// `n` detections spread over a lon/lat box with a fixed linear congruential
/// sequence, so every call yields the same data.
///
/// Sizes cycle through 0.25..=4.0 in quarter inches; days cover the whole year.
pub fn scattered_observations(n: usize, bbox: (f64, f64, f64, f64)) -> Vec<Observation> {
    let (min_lon, min_lat, max_lon, max_lat) = bbox;
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    (0..n)
        .map(|i| {
            let lon = min_lon + next() * (max_lon - min_lon);
            let lat = min_lat + next() * (max_lat - min_lat);
            let day_of_year = (next() * 365.0) as u32;
            let date = NaiveDate::from_yo_opt(2015, day_of_year + 1).expect("2015 has 365 days");
            let size = 0.25 * ((i % 16) + 1) as f64;
            Observation::new(
                date.and_hms_opt(18, 0, 0).expect("valid time"),
                lon,
                lat,
                size,
            )
            .expect("valid month")
        })
        .collect()
}
