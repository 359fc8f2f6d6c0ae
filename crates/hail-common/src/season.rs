//! Meteorological seasons.
//!
//! The twelve months are split into four consecutive three-month groups
//! starting in December. Every month belongs to exactly one season.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{HailError, HailResult};

/// A meteorological season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    /// December, January, February
    Winter,
    /// March, April, May
    Spring,
    /// June, July, August
    Summer,
    /// September, October, November
    Fall,
}

impl Season {
    /// All seasons in calendar order starting with winter.
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    /// Season containing the given month (1 = January).
    ///
    /// A month outside 1..=12 can only come from a broken date parser, so it
    /// is reported as an invariant violation rather than a parse error.
    pub fn from_month(month: u32) -> HailResult<Season> {
        match month {
            12 | 1 | 2 => Ok(Season::Winter),
            3..=5 => Ok(Season::Spring),
            6..=8 => Ok(Season::Summer),
            9..=11 => Ok(Season::Fall),
            _ => Err(HailError::invariant(format!(
                "month {} does not belong to any season",
                month
            ))),
        }
    }

    /// The three months of this season, in order.
    pub fn months(&self) -> [u32; 3] {
        match self {
            Season::Winter => [12, 1, 2],
            Season::Spring => [3, 4, 5],
            Season::Summer => [6, 7, 8],
            Season::Fall => [9, 10, 11],
        }
    }

    /// Three-letter month code, e.g. "DJF".
    pub fn code(&self) -> &'static str {
        match self {
            Season::Winter => "DJF",
            Season::Spring => "MAM",
            Season::Summer => "JJA",
            Season::Fall => "SON",
        }
    }

    /// Lowercase name used in output file names.
    pub fn name(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
        }
    }

    /// Whether the season contains the given month.
    pub fn contains_month(&self, month: u32) -> bool {
        self.months().contains(&month)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        };
        write!(f, "{} ({})", label, self.code())
    }
}
