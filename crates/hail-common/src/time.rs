//! Timestamp parsing for radar detections.

use chrono::{DateTime, NaiveDateTime};

/// Formats tried in order after RFC 3339.
///
/// The first is the compact `ZTIME` form used by the NOAA Severe Weather
/// Data Inventory exports (e.g. `20150612234512`).
const NAIVE_FORMATS: [&str; 4] = [
    "%Y%m%d%H%M%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

/// Parse an observation timestamp. Offsets are normalized to UTC.
pub fn parse_observation_time(s: &str) -> Result<NaiveDateTime, TimeParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(TimeParseError::Empty);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| TimeParseError::InvalidFormat(s.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Empty timestamp")]
    Empty,

    #[error("Invalid timestamp format: {0}")]
    InvalidFormat(String),
}
