//! Hail climatology report.
//!
//! Library half of the `hail-report` binary: configuration loading and the
//! end-to-end run, so both can be exercised from tests.

pub mod config;
pub mod report;

pub use config::ReportConfig;
pub use report::{run_report, ReportInputs, RunSummary};
