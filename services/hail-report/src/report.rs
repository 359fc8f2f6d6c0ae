//! One report run: load inputs, grid, write outputs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use grid_processor::{write_analysis, HailPipeline, PipelineDiagnostics, WrittenOutputs};
use ingestion::{load_boundaries, load_observations, CleaningReport};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::ReportConfig;

/// Input files for a run.
#[derive(Debug, Clone)]
pub struct ReportInputs {
    /// Detection CSV (optionally `.gz`)
    pub observations: PathBuf,
    /// State boundary GeoJSON (optionally `.gz`)
    pub boundaries: PathBuf,
}

/// What a run did, for logging and for callers.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub cleaning: CleaningReport,
    pub regions: usize,
    pub excluded_regions: Vec<String>,
    pub skipped_features: usize,
    pub diagnostics: PipelineDiagnostics,
    pub output_dir: PathBuf,
    #[serde(skip)]
    pub outputs: WrittenOutputs,
}

/// Run the full report.
///
/// # Errors
/// Any fatal error from loading, gridding or writing, with context naming
/// the failing step.
pub fn run_report(inputs: &ReportInputs, config: &ReportConfig) -> Result<RunSummary> {
    config.validate()?;
    let output_dir = config
        .output_dir
        .clone()
        .context("No output directory configured (use --output-dir or HAIL_OUTPUT_DIR)")?;

    let pipeline =
        HailPipeline::us_national_atlas(config.grid_config()).context("Invalid grid configuration")?;

    let cleaned = load_observations(&inputs.observations, &config.cleaning_options())
        .with_context(|| format!("Failed to load detections from {}", inputs.observations.display()))?;
    let boundaries = load_boundaries(&inputs.boundaries)
        .with_context(|| format!("Failed to load boundaries from {}", inputs.boundaries.display()))?;

    if cleaned.observations.is_empty() {
        warn!("No detections survived cleaning; all layers will be empty");
    }

    let analysis = pipeline
        .run(cleaned.observations, &boundaries.regions)
        .context("Hail climatology failed")?;

    let outputs = write_analysis(&analysis, Path::new(&output_dir))
        .with_context(|| format!("Failed to write outputs to {}", output_dir.display()))?;

    let summary = RunSummary {
        cleaning: cleaned.report,
        regions: boundaries.regions.len(),
        excluded_regions: boundaries.excluded,
        skipped_features: boundaries.skipped,
        diagnostics: analysis.diagnostics,
        output_dir,
        outputs,
    };

    info!(
        kept = summary.cleaning.kept,
        dropped = summary.cleaning.dropped(),
        regions = summary.regions,
        cells_with_data = summary.diagnostics.cells_with_data,
        output_dir = %summary.output_dir.display(),
        "Report complete"
    );

    Ok(summary)
}
