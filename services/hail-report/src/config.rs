//! Report configuration.
//!
//! Precedence, lowest first: built-in defaults, the YAML file, `HAIL_*`
//! environment variables, command-line flags.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use grid_processor::{ExtentOverride, GridConfig, DEFAULT_RESOLUTION_M};
use hail_common::DayKey;
use ingestion::config::DEFAULT_MIN_HAIL_PROBABILITY;
use ingestion::CleaningOptions;
use serde::{Deserialize, Serialize};

/// Top-level report configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Cell edge length in meters
    pub resolution_m: f64,

    /// Fixed grid extent in meters
    pub extent: Option<ExtentOverride>,

    /// Minimum POH to keep a detection
    pub min_hail_probability: i32,

    /// Write per-season layers as well
    pub seasonal: bool,

    /// Hail day grouping
    pub day_key: DayKey,

    /// Where outputs are written
    pub output_dir: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            resolution_m: DEFAULT_RESOLUTION_M,
            extent: None,
            min_hail_probability: DEFAULT_MIN_HAIL_PROBABILITY,
            seasonal: false,
            day_key: DayKey::MonthDay,
            output_dir: None,
        }
    }
}

impl ReportConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty document means all defaults
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `HAIL_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply `HAIL_*` overrides from any variable lookup.
    ///
    /// Recognised: `HAIL_RESOLUTION_M`, `HAIL_EXTENT` (`w,h`),
    /// `HAIL_MIN_HAIL_PROBABILITY`, `HAIL_SEASONAL`, `HAIL_DAY_KEY`,
    /// `HAIL_OUTPUT_DIR`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("HAIL_RESOLUTION_M") {
            self.resolution_m = val
                .trim()
                .parse()
                .with_context(|| format!("HAIL_RESOLUTION_M is not a number: '{}'", val))?;
        }

        if let Some(val) = lookup("HAIL_EXTENT") {
            self.extent = Some(ExtentOverride::parse(&val).context("Invalid HAIL_EXTENT")?);
        }

        if let Some(val) = lookup("HAIL_MIN_HAIL_PROBABILITY") {
            self.min_hail_probability = val
                .trim()
                .parse()
                .with_context(|| format!("HAIL_MIN_HAIL_PROBABILITY is not an integer: '{}'", val))?;
        }

        if let Some(val) = lookup("HAIL_SEASONAL") {
            self.seasonal = parse_flag(&val).context("Invalid HAIL_SEASONAL")?;
        }

        if let Some(val) = lookup("HAIL_DAY_KEY") {
            self.day_key = val.parse().context("Invalid HAIL_DAY_KEY")?;
        }

        if let Some(val) = lookup("HAIL_OUTPUT_DIR") {
            self.output_dir = Some(PathBuf::from(val));
        }

        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.grid_config()
            .validate()
            .context("Invalid grid configuration")?;
        self.cleaning_options()
            .validate()
            .context("Invalid cleaning configuration")?;
        Ok(())
    }

    /// Options for the detection cleaner.
    pub fn cleaning_options(&self) -> CleaningOptions {
        CleaningOptions {
            min_hail_probability: self.min_hail_probability,
        }
    }

    /// Options for the grid pipeline.
    pub fn grid_config(&self) -> GridConfig {
        GridConfig {
            resolution_m: self.resolution_m,
            extent: self.extent,
            day_key: self.day_key,
            seasonal: self.seasonal,
        }
    }
}

/// Parse a boolean environment value (`true`/`false`, `1`/`0`, `yes`/`no`).
fn parse_flag(val: &str) -> Result<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => bail!("expected true or false, got '{}'", other),
    }
}
