//! Reporting utilities: run summaries and formatted terminal output.

use chrono::NaiveDate;

use crate::domain::RegionMetrics;

pub mod format;

pub use format::*;

/// Headline numbers for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub region: String,
    pub window: usize,
    pub rows: usize,
    pub first_date: NaiveDate,
    pub latest_date: NaiveDate,
    pub latest_confirmed: u64,
    pub latest_daily_new: u64,
    pub latest_moving_average: f64,
    pub peak_moving_average: f64,
    pub peak_date: NaiveDate,
    pub total_new: u64,
    pub revisions: usize,
}

/// Summarize a derived table. `None` for an empty table.
pub fn summarize(metrics: &RegionMetrics) -> Option<Summary> {
    let first = metrics.rows.first()?;
    let last = metrics.rows.last()?;

    // Earliest date wins on ties.
    let peak = metrics
        .rows
        .iter()
        .fold(first, |best, r| if r.moving_average > best.moving_average { r } else { best });

    Some(Summary {
        region: metrics.region.clone(),
        window: metrics.window,
        rows: metrics.rows.len(),
        first_date: first.date,
        latest_date: last.date,
        latest_confirmed: last.confirmed,
        latest_daily_new: last.daily_new,
        latest_moving_average: last.moving_average,
        peak_moving_average: peak.moving_average,
        peak_date: peak.date,
        total_new: metrics.rows.iter().map(|r| r.daily_new).sum(),
        revisions: metrics.revisions.len(),
    })
}
