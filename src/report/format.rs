//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the metric code stays clean and testable
//! - output changes are localized

use crate::domain::{MetricRow, RegionMetrics};
use crate::io::ingest::Dataset;
use crate::report::Summary;

/// Format the run summary block.
pub fn format_summary(summary: &Summary, dataset: &Dataset) -> String {
    let mut out = String::new();

    out.push_str("=== epi - case velocity ===\n");
    out.push_str(&format!("Region: {}\n", summary.region));
    out.push_str(&format!(
        "Rows: {} | dates=[{}, {}]\n",
        summary.rows, summary.first_date, summary.latest_date
    ));
    out.push_str(&format!(
        "Source: {} rows read, {} skipped\n",
        dataset.rows_read(),
        dataset.row_errors().len()
    ));

    out.push('\n');
    out.push_str(&format!("Latest ({}):\n", summary.latest_date));
    out.push_str(&format!("  confirmed: {}\n", summary.latest_confirmed));
    out.push_str(&format!("  daily new: {}\n", summary.latest_daily_new));
    out.push_str(&format!(
        "  {}-day average: {:.2}\n",
        summary.window, summary.latest_moving_average
    ));
    out.push_str(&format!(
        "Peak {}-day average: {:.2} on {}\n",
        summary.window, summary.peak_moving_average, summary.peak_date
    ));
    out.push_str(&format!("Total new cases: {}\n", summary.total_new));
    if summary.revisions > 0 {
        out.push_str(&format!(
            "Downward revisions clamped: {}\n",
            summary.revisions
        ));
    }

    out
}

/// Format the last `n` rows as a fixed-width table.
pub fn format_tail(metrics: &RegionMetrics, n: usize) -> String {
    let mut out = String::new();
    if n == 0 || metrics.rows.is_empty() {
        return out;
    }

    let start = metrics.rows.len().saturating_sub(n);
    out.push_str(&format!(
        "{:<10}  {:>12}  {:>10}  {:>10}\n",
        "date",
        "confirmed",
        "daily_new",
        format!("ma_{}d", metrics.window)
    ));
    for r in &metrics.rows[start..] {
        out.push_str(&format_row(r));
        out.push('\n');
    }
    out
}

fn format_row(r: &MetricRow) -> String {
    format!(
        "{:<10}  {:>12}  {:>10}  {:>10.2}",
        r.date.to_string(),
        r.confirmed,
        r.daily_new,
        r.moving_average
    )
}

/// Format the region listing printed by `epi regions`.
pub fn format_regions(regions: &[(String, usize)]) -> String {
    let width = regions.iter().map(|(name, _)| name.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for (name, count) in regions {
        out.push_str(&format!("{name:<width$}  {count:>6}\n"));
    }
    out.push_str(&format!("{} region(s)\n", regions.len()));
    out
}
