//! Loading and cleaning radar hail detections.
//!
//! Rows go through three gates, in order:
//!
//! 1. Framing: the row must have the header's field count and typed fields
//!    must parse (otherwise: malformed)
//! 2. Probability: POH/POSH must not be the sentinel and POH must reach the
//!    threshold (see [`classify`])
//! 3. Timestamp: must parse into a calendar date (otherwise: malformed)
//!
//! Malformed rows are dropped with a warning naming the row number. Only I/O
//! failures and a missing required column abort the read.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use hail_common::{parse_observation_time, HailError, Observation};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{classify, CleaningOptions, RowDisposition};
use crate::source::open_input;
use crate::{IngestionError, Result};

/// Columns that must be present after header normalization.
const REQUIRED_COLUMNS: [&str; 6] = [
    "timestamp",
    "lon",
    "lat",
    "severity_prob",
    "hail_prob",
    "max_size",
];

/// Map a raw header to its canonical column name.
///
/// Accepts the SWDI names (`#ZTIME`, `WSR_ID`, `SEVPROB`, `PROB`, `MAXSIZE`,
/// ...) as well as descriptive names, case-insensitively.
fn canonical_column(header: &str) -> Option<&'static str> {
    let name = header.trim().trim_start_matches('#').to_ascii_lowercase();
    match name.as_str() {
        "ztime" | "timestamp" | "time" | "datetime" => Some("timestamp"),
        "lon" | "longitude" => Some("lon"),
        "lat" | "latitude" => Some("lat"),
        "wsr_id" | "station_id" | "station" => Some("station_id"),
        "cell_id" => Some("cell_id"),
        "range" => Some("range"),
        "azimuth" => Some("azimuth"),
        "sevprob" | "severity_prob" | "severe_prob" | "posh" => Some("severity_prob"),
        "prob" | "hail_prob" | "poh" => Some("hail_prob"),
        "maxsize" | "max_size" | "mehs" => Some("max_size"),
        _ => None,
    }
}

/// Rewrite a header record to canonical column names.
fn normalize_headers(headers: &StringRecord) -> Result<StringRecord> {
    let normalized: StringRecord = headers
        .iter()
        .map(|h| canonical_column(h).map(str::to_string).unwrap_or_else(|| h.to_string()))
        .collect();

    for required in REQUIRED_COLUMNS {
        if !normalized.iter().any(|h| h == required) {
            return Err(IngestionError::MissingColumn(required));
        }
    }

    Ok(normalized)
}

/// One CSV row, typed but not yet validated.
#[derive(Debug, Deserialize)]
struct HailRecord {
    timestamp: String,
    lon: f64,
    lat: f64,
    #[serde(default)]
    station_id: String,
    #[serde(default)]
    cell_id: String,
    #[serde(default)]
    range: Option<f64>,
    #[serde(default)]
    azimuth: Option<f64>,
    severity_prob: i32,
    hail_prob: i32,
    max_size: f64,
}

impl HailRecord {
    fn into_observation(self, row: u64) -> hail_common::HailResult<Observation> {
        let timestamp = parse_observation_time(&self.timestamp)
            .map_err(|e| HailError::parse(row, e.to_string()))?;

        Ok(Observation::new(timestamp, self.lon, self.lat, self.max_size)?
            .with_probabilities(self.hail_prob, self.severity_prob)
            .with_station(self.station_id)
            .with_cell(self.cell_id)
            .with_radar_geometry(self.range, self.azimuth))
    }
}

/// Row counts from a cleaning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub rows_read: usize,
    pub kept: usize,
    /// POH or POSH carried the missing-value sentinel
    pub dropped_sentinel: usize,
    /// POH below the threshold
    pub dropped_low_probability: usize,
    /// Unparseable timestamp, non-numeric field, or wrong field count
    pub dropped_malformed: usize,
}

impl CleaningReport {
    pub fn dropped(&self) -> usize {
        self.dropped_sentinel + self.dropped_low_probability + self.dropped_malformed
    }

    fn record(&mut self, disposition: RowDisposition) {
        match disposition {
            RowDisposition::Keep => self.kept += 1,
            RowDisposition::Sentinel => self.dropped_sentinel += 1,
            RowDisposition::LowProbability => self.dropped_low_probability += 1,
        }
    }
}

/// Cleaned detections plus the counts explaining what was dropped.
#[derive(Debug, Clone, Default)]
pub struct CleanedObservations {
    pub observations: Vec<Observation>,
    pub report: CleaningReport,
}

/// csv errors that concern a single row rather than the whole stream.
fn is_row_error(err: &csv::Error) -> bool {
    matches!(
        err.kind(),
        csv::ErrorKind::UnequalLengths { .. }
            | csv::ErrorKind::Utf8 { .. }
            | csv::ErrorKind::Deserialize { .. }
    )
}

/// Read and clean detections from CSV text.
pub fn read_observations<R: Read>(reader: R, options: &CleaningOptions) -> Result<CleanedObservations> {
    options.validate()?;

    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .comment(None)
        .from_reader(reader);

    let headers = normalize_headers(rdr.headers()?)?;
    let mut cleaned = CleanedObservations::default();

    for (index, result) in rdr.records().enumerate() {
        let row = index as u64 + 1;
        cleaned.report.rows_read += 1;

        let parsed = result.and_then(|record| record.deserialize::<HailRecord>(Some(&headers)));
        let record = match parsed {
            Ok(record) => record,
            Err(e) if is_row_error(&e) => {
                warn!(row, error = %e, "Dropping malformed detection row");
                cleaned.report.dropped_malformed += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let disposition = classify(record.hail_prob, record.severity_prob, options);
        if disposition != RowDisposition::Keep {
            cleaned.report.record(disposition);
            continue;
        }

        match record.into_observation(row) {
            Ok(obs) => {
                cleaned.report.record(RowDisposition::Keep);
                cleaned.observations.push(obs);
            }
            Err(e) if !e.is_fatal() => {
                warn!(row, error = %e, "Dropping detection with unparseable timestamp");
                cleaned.report.dropped_malformed += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let report = &cleaned.report;
    info!(
        rows = report.rows_read,
        kept = report.kept,
        sentinel = report.dropped_sentinel,
        low_probability = report.dropped_low_probability,
        malformed = report.dropped_malformed,
        "Cleaned hail detections"
    );

    Ok(cleaned)
}

/// Open a detection file (optionally `.gz`) and clean it.
pub fn load_observations(path: impl AsRef<Path>, options: &CleaningOptions) -> Result<CleanedObservations> {
    let path = path.as_ref();
    info!(path = %path.display(), "Loading hail detections");
    read_observations(open_input(path)?, options)
}

/// Apply the probability gate to detections already in memory.
pub fn filter_observations<I>(observations: I, options: &CleaningOptions) -> CleanedObservations
where
    I: IntoIterator<Item = Observation>,
{
    let mut cleaned = CleanedObservations::default();
    for obs in observations {
        cleaned.report.rows_read += 1;
        let disposition = classify(obs.hail_probability, obs.severe_probability, options);
        cleaned.report.record(disposition);
        if disposition == RowDisposition::Keep {
            cleaned.observations.push(obs);
        }
    }
    cleaned
}
