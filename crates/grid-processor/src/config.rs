//! Configuration for the grid processor.

use std::fmt;
use std::str::FromStr;

use hail_common::DayKey;
use serde::{Deserialize, Serialize};

use crate::error::{GridProcessorError, Result};

/// Default cell size: 25 km.
pub const DEFAULT_RESOLUTION_M: f64 = 25_000.0;

/// Configuration for one gridding run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cell edge length in meters (square cells).
    pub resolution_m: f64,

    /// Fixed grid extent; the boundary span is used when absent.
    pub extent: Option<ExtentOverride>,

    /// How detections are grouped into hail days.
    pub day_key: DayKey,

    /// Also produce one grid pair per season.
    pub seasonal: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            resolution_m: DEFAULT_RESOLUTION_M,
            extent: None,
            day_key: DayKey::MonthDay,
            seasonal: false,
        }
    }
}

impl GridConfig {
    /// Validate the configuration.
    ///
    /// Checks that need the boundary span (resolution vs extent, override
    /// vs span) happen when the grid is built.
    pub fn validate(&self) -> Result<()> {
        if !self.resolution_m.is_finite() || self.resolution_m <= 0.0 {
            return Err(GridProcessorError::config(format!(
                "resolution must be a positive number of meters, got {}",
                self.resolution_m
            )));
        }

        if let Some(extent) = &self.extent {
            extent.validate()?;
        }

        Ok(())
    }
}

/// Explicit grid width and height in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtentOverride {
    pub width_m: f64,
    pub height_m: f64,
}

impl ExtentOverride {
    pub fn new(width_m: f64, height_m: f64) -> Self {
        Self { width_m, height_m }
    }

    /// Parse `"width,height"` in meters, e.g. `"4550000,2850000"`.
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let &[width, height] = parts.as_slice() else {
            return Err(GridProcessorError::config(format!(
                "extent must be 'width,height' in meters, got '{}'",
                s
            )));
        };

        let parse = |v: &str| {
            v.parse::<f64>().map_err(|_| {
                GridProcessorError::config(format!("invalid extent dimension '{}'", v))
            })
        };

        let extent = Self::new(parse(width)?, parse(height)?);
        extent.validate()?;
        Ok(extent)
    }

    fn validate(&self) -> Result<()> {
        for (axis, value) in [("width", self.width_m), ("height", self.height_m)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GridProcessorError::config(format!(
                    "extent {} must be positive, got {}",
                    axis, value
                )));
            }
        }
        Ok(())
    }
}

impl FromStr for ExtentOverride {
    type Err = GridProcessorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ExtentOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.width_m, self.height_m)
    }
}
