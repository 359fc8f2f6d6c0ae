//! Common types shared across the hail climatology crates.

pub mod bbox;
pub mod boundary;
pub mod crs;
pub mod error;
pub mod geojson;
pub mod observation;
pub mod season;
pub mod time;

pub use bbox::BoundingBox;
pub use boundary::{is_contiguous_region, BoundaryPolygon, CONTIGUOUS_REGIONS};
pub use crs::{CrsCode, CrsParseError};
pub use error::{HailError, HailResult};
pub use observation::{DayKey, Observation, PlanarPoint};
pub use season::Season;
pub use time::{parse_observation_time, TimeParseError};
