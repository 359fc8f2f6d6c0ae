//! Radar hail detections and their planar counterparts.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{HailError, HailResult, Season};

/// A single hail signature detected by a radar.
///
/// Probabilities are percentages in 0..=100; `-999` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Detection time (UTC)
    pub timestamp: NaiveDateTime,
    /// Longitude in degrees
    pub lon: f64,
    /// Latitude in degrees
    pub lat: f64,
    /// Radar station identifier (e.g. "KTLX")
    pub station_id: String,
    /// Storm cell identifier assigned by the radar
    pub cell_id: String,
    /// Distance from the radar in nautical miles
    pub range_nmi: Option<f64>,
    /// Bearing from the radar in degrees
    pub azimuth_deg: Option<f64>,
    /// Probability of hail (POH)
    pub hail_probability: i32,
    /// Probability of severe hail (POSH)
    pub severe_probability: i32,
    /// Maximum estimated hail size (MEHS), inches
    pub max_size_in: f64,
    season: Season,
}

impl Observation {
    /// Create an observation with certain hail and zero severe probability.
    ///
    /// The season is derived here and never recomputed.
    pub fn new(timestamp: NaiveDateTime, lon: f64, lat: f64, max_size_in: f64) -> HailResult<Self> {
        let season = Season::from_month(timestamp.month())?;
        Ok(Self {
            timestamp,
            lon,
            lat,
            station_id: String::new(),
            cell_id: String::new(),
            range_nmi: None,
            azimuth_deg: None,
            hail_probability: 100,
            severe_probability: 0,
            max_size_in,
            season,
        })
    }

    /// Set the hail and severe hail probabilities.
    pub fn with_probabilities(mut self, hail: i32, severe: i32) -> Self {
        self.hail_probability = hail;
        self.severe_probability = severe;
        self
    }

    /// Set the detecting radar.
    pub fn with_station(mut self, station_id: impl Into<String>) -> Self {
        self.station_id = station_id.into();
        self
    }

    /// Set the storm cell identifier.
    pub fn with_cell(mut self, cell_id: impl Into<String>) -> Self {
        self.cell_id = cell_id.into();
        self
    }

    /// Set range and azimuth from the radar.
    pub fn with_radar_geometry(mut self, range_nmi: Option<f64>, azimuth_deg: Option<f64>) -> Self {
        self.range_nmi = range_nmi;
        self.azimuth_deg = azimuth_deg;
        self
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }

    pub fn month(&self) -> u32 {
        self.timestamp.month()
    }

    pub fn day(&self) -> u32 {
        self.timestamp.day()
    }

    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    pub fn minute(&self) -> u32 {
        self.timestamp.minute()
    }

    pub fn second(&self) -> u32 {
        self.timestamp.second()
    }

    /// Key identifying the calendar day of this observation.
    pub fn day_key(&self, key: DayKey) -> u32 {
        key.encode(self.timestamp)
    }
}

/// An observation together with its position in the equal-area plane.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarPoint {
    pub observation: Observation,
    /// Easting in meters
    pub x: f64,
    /// Northing in meters
    pub y: f64,
}

impl PlanarPoint {
    pub fn new(observation: Observation, x: f64, y: f64) -> Self {
        Self { observation, x, y }
    }
}

/// How observations are grouped into hail days.
///
/// `MonthDay` ignores the year and is only correct for single-year inputs;
/// `CalendarDate` keeps days from different years apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayKey {
    #[default]
    MonthDay,
    CalendarDate,
}

impl DayKey {
    /// Encode a timestamp's day as an integer (MMDD or YYYYMMDD).
    pub fn encode(&self, timestamp: NaiveDateTime) -> u32 {
        let month_day = timestamp.month() * 100 + timestamp.day();
        match self {
            DayKey::MonthDay => month_day,
            DayKey::CalendarDate => timestamp.year().unsigned_abs() * 10_000 + month_day,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayKey::MonthDay => "month-day",
            DayKey::CalendarDate => "calendar-date",
        }
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayKey {
    type Err = HailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "month-day" => Ok(DayKey::MonthDay),
            "calendar-date" | "date" => Ok(DayKey::CalendarDate),
            other => Err(HailError::configuration(format!(
                "unknown day key '{}', expected 'month-day' or 'calendar-date'",
                other
            ))),
        }
    }
}
