//! Read/write metrics JSON files.
//!
//! Metrics JSON is the "portable" representation of one run:
//! - region + smoothing window
//! - the source it was derived from
//! - every augmented row, so it can be re-plotted without the source table
//!
//! The schema is defined by `domain::MetricsFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{MetricsFile, RegionMetrics};
use crate::error::{AppError, EXIT_INPUT};

pub const TOOL_NAME: &str = "epi";

impl MetricsFile {
    pub fn from_metrics(metrics: &RegionMetrics, source: &Path) -> Self {
        Self {
            tool: TOOL_NAME.to_string(),
            region: metrics.region.clone(),
            window: metrics.window,
            generated_from: source.display().to_string(),
            rows: metrics.rows.clone(),
        }
    }
}

/// Write a metrics JSON file.
pub fn write_metrics_json(path: &Path, metrics: &RegionMetrics, source: &Path) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create metrics JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &MetricsFile::from_metrics(metrics, source))
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write metrics JSON: {e}")))?;

    Ok(())
}

/// Read a metrics JSON file.
pub fn read_metrics_json(path: &Path) -> Result<MetricsFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to open metrics JSON '{}': {e}", path.display())))?;
    let saved: MetricsFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid metrics JSON: {e}")))?;
    Ok(saved)
}
