//! Shared "metrics pipeline" logic.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> select -> derive -> summarize
//!
//! The front-end (`app`) can then focus on presentation and exports.

use crate::domain::{MetricsConfig, RegionMetrics};
use crate::error::AppError;
use crate::io::ingest::{Dataset, load_dataset};
use crate::io::select::{SelectOptions, select_region_with};
use crate::metrics::ObservedDeriver;
use crate::report::{Summary, summarize};

/// All computed outputs of a single `epi metrics` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: Dataset,
    pub metrics: RegionMetrics,
    pub summary: Summary,
}

/// Execute the full pipeline: load the configured file, then derive.
///
/// `Ok(None)` means the file was fine but the region has no rows.
pub fn run_metrics(config: &MetricsConfig) -> Result<Option<RunOutput>, AppError> {
    let dataset = load_dataset(&config.data_path)?;
    Ok(run_metrics_on(dataset, config))
}

/// Execute the pipeline on an already-loaded dataset.
///
/// `None` when the region is unknown or has no rows inside the date window.
pub fn run_metrics_on(dataset: Dataset, config: &MetricsConfig) -> Option<RunOutput> {
    let opts = SelectOptions {
        aggregate: config.aggregate,
    };
    let series = select_region_with(&dataset, &config.region, opts)?;

    // Derive over the whole region before trimming to the date window.
    let metrics = ObservedDeriver::new(config.window)
        .run(&series)
        .within(config.date_from, config.date_to);
    let summary = summarize(&metrics)?;

    Some(RunOutput {
        dataset,
        metrics,
        summary,
    })
}
