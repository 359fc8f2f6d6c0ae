//! Hail climatology report CLI.
//!
//! Grids radar hail detections onto a 25 km equal-area grid over the
//! contiguous US and writes max-size and hail-day rasters.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use grid_processor::ExtentOverride;
use hail_common::DayKey;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use hail_report::{run_report, ReportConfig, ReportInputs};

#[derive(Parser, Debug)]
#[command(name = "hail-report")]
#[command(about = "Hail climatology grids from radar hail detections")]
struct Args {
    /// Detection CSV (NOAA SWDI nx3hail layout; .gz accepted)
    #[arg(long, env = "HAIL_OBSERVATIONS")]
    observations: PathBuf,

    /// State boundaries as GeoJSON (.gz accepted)
    #[arg(long, env = "HAIL_BOUNDARIES")]
    boundaries: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long, env = "HAIL_CONFIG")]
    config: Option<PathBuf>,

    /// Cell size in meters
    #[arg(long)]
    resolution: Option<f64>,

    /// Fixed grid extent in meters, as width,height
    #[arg(long, value_parser = parse_extent)]
    extent: Option<ExtentOverride>,

    /// Also write per-season layers
    #[arg(long)]
    seasonal: bool,

    /// Hail day grouping: month-day or calendar-date
    #[arg(long, value_parser = parse_day_key)]
    day_key: Option<DayKey>,

    /// Log level, used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn parse_extent(s: &str) -> std::result::Result<ExtentOverride, String> {
    ExtentOverride::parse(s).map_err(|e| e.to_string())
}

fn parse_day_key(s: &str) -> std::result::Result<DayKey, String> {
    s.parse().map_err(|e: hail_common::HailError| e.to_string())
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let builder = fmt().with_env_filter(filter).with_target(true).with_level(true);
    if args.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Defaults, then the YAML file, then HAIL_* variables, then flags.
fn load_config(args: &Args) -> Result<ReportConfig> {
    let mut config = match &args.config {
        Some(path) => ReportConfig::from_yaml(path)?,
        None => ReportConfig::default(),
    };
    config.apply_env()?;

    if let Some(resolution) = args.resolution {
        config.resolution_m = resolution;
    }
    if let Some(extent) = args.extent {
        config.extent = Some(extent);
    }
    if args.seasonal {
        config.seasonal = true;
    }
    if let Some(day_key) = args.day_key {
        config.day_key = day_key;
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = Some(dir.clone());
    }

    config.validate()?;
    Ok(config)
}

fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args);

    if let Err(e) = run(&args) {
        error!(error = %format!("{:#}", e), "Hail report failed");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    info!(
        resolution_m = config.resolution_m,
        seasonal = config.seasonal,
        day_key = %config.day_key,
        min_hail_probability = config.min_hail_probability,
        "Starting hail report"
    );

    let inputs = ReportInputs {
        observations: args.observations.clone(),
        boundaries: args.boundaries.clone(),
    };
    let summary = run_report(&inputs, &config)?;

    info!(
        summary = %serde_json::to_string(&summary)?,
        "Run summary"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_flag_ignores_rust_log() {
        std::env::set_var("RUST_LOG", "trace");
        let args = Args::try_parse_from([
            "hail-report",
            "--observations",
            "detections.csv",
            "--boundaries",
            "states.geojson",
        ])
        .unwrap();
        assert_eq!(args.log_level, "info");

        let args = Args::try_parse_from([
            "hail-report",
            "--observations",
            "detections.csv",
            "--boundaries",
            "states.geojson",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.log_level, "debug");
    }
}
