//! Export the augmented per-region table to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::RegionMetrics;
use crate::error::{AppError, EXIT_INPUT};

/// Write the augmented table to a CSV file.
pub fn write_metrics_csv(path: &Path, metrics: &RegionMetrics) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_metrics(file, metrics)
}

/// Write the augmented table as CSV to any writer.
pub fn write_metrics<W: Write>(out: W, metrics: &RegionMetrics) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(out);

    let average_column = format!("moving_average_{}d", metrics.window);
    wtr.write_record([
        "date",
        "region",
        "subregion",
        "confirmed",
        "deaths",
        "recovered",
        "daily_new",
        average_column.as_str(),
    ])
    .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write export CSV header: {e}")))?;

    for r in &metrics.rows {
        wtr.write_record([
            r.date.to_string(),
            r.region.clone(),
            r.subregion.clone().unwrap_or_default(),
            r.confirmed.to_string(),
            r.deaths.map(|v| v.to_string()).unwrap_or_default(),
            r.recovered.map(|v| v.to_string()).unwrap_or_default(),
            r.daily_new.to_string(),
            format!("{:.4}", r.moving_average),
        ])
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write export CSV row: {e}")))?;
    }

    wtr.flush()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to flush export CSV: {e}")))
}
