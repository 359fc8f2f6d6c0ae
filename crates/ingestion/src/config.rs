//! Row filtering rules for radar detections.
//!
//! Defines which detections are confident enough to be aggregated.

use hail_common::{HailError, HailResult};
use serde::{Deserialize, Serialize};

/// Value the radar export uses for a missing probability.
pub const PROBABILITY_SENTINEL: i32 = -999;

/// Default POH threshold: only certain hail is kept.
pub const DEFAULT_MIN_HAIL_PROBABILITY: i32 = 100;

/// Options controlling which rows survive cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningOptions {
    /// Minimum probability of hail (POH) to keep a detection.
    pub min_hail_probability: i32,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            min_hail_probability: DEFAULT_MIN_HAIL_PROBABILITY,
        }
    }
}

impl CleaningOptions {
    /// Validate the options.
    pub fn validate(&self) -> HailResult<()> {
        if !(0..=100).contains(&self.min_hail_probability) {
            return Err(HailError::configuration(format!(
                "min_hail_probability must be 0-100, got {}",
                self.min_hail_probability
            )));
        }
        Ok(())
    }
}

/// What happens to a row after the probability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDisposition {
    Keep,
    /// POH or POSH is negative (the -999 sentinel or any other missing marker)
    Sentinel,
    /// POH below the configured threshold
    LowProbability,
}

/// Classify a row by its hail (POH) and severe hail (POSH) probabilities.
///
/// # Arguments
/// * `hail_probability` - POH, 0-100 or sentinel
/// * `severe_probability` - POSH, 0-100 or sentinel
/// * `options` - Cleaning thresholds
pub fn classify(hail_probability: i32, severe_probability: i32, options: &CleaningOptions) -> RowDisposition {
    if hail_probability < 0 || severe_probability < 0 {
        RowDisposition::Sentinel
    } else if hail_probability < options.min_hail_probability {
        RowDisposition::LowProbability
    } else {
        RowDisposition::Keep
    }
}
