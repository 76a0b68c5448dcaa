//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during ingest, selection and derivation
//! - exported to CSV/JSON
//! - reloaded later for plotting

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observation from the source table. Never mutated after ingest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesRecord {
    pub date: NaiveDate,
    pub region: String,
    /// Province/state when the source breaks a country down further.
    pub subregion: Option<String>,
    pub cumulative_confirmed: u64,
    pub deaths: Option<u64>,
    pub recovered: Option<u64>,
}

/// The records of a single region, sorted by date ascending.
///
/// Dates are non-decreasing; equal dates keep ingestion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSeries {
    pub region: String,
    pub records: Vec<TimeSeriesRecord>,
}

impl RegionSeries {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The cumulative counter column, in row order.
    pub fn cumulative(&self) -> Vec<u64> {
        self.records.iter().map(|r| r.cumulative_confirmed).collect()
    }
}

/// Output of the metric derivation: parallel columns, one entry per input value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedSeries {
    pub daily_new: Vec<u64>,
    pub smoothed: Vec<f64>,
}

impl DerivedSeries {
    pub fn len(&self) -> usize {
        self.daily_new.len()
    }

    pub fn is_empty(&self) -> bool {
        self.daily_new.is_empty()
    }
}

/// A point where the cumulative counter went down (a reporting correction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub index: usize,
    pub previous: u64,
    pub current: u64,
}

impl Revision {
    pub fn decline(&self) -> u64 {
        self.previous - self.current
    }
}

/// One row of the augmented per-region table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub date: NaiveDate,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subregion: Option<String>,
    pub confirmed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deaths: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovered: Option<u64>,
    pub daily_new: u64,
    pub moving_average: f64,
}

/// The augmented table for one region, in the same row order as the selection.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMetrics {
    pub region: String,
    pub window: usize,
    pub rows: Vec<MetricRow>,
    pub revisions: Vec<Revision>,
}

impl RegionMetrics {
    /// Zip the selected records with their derived columns.
    ///
    /// `derived` must come from `series` (same length).
    pub fn assemble(series: &RegionSeries, derived: &DerivedSeries, window: usize, revisions: Vec<Revision>) -> Self {
        let rows = series
            .records
            .iter()
            .zip(derived.daily_new.iter().zip(derived.smoothed.iter()))
            .map(|(rec, (&daily_new, &moving_average))| MetricRow {
                date: rec.date,
                region: rec.region.clone(),
                subregion: rec.subregion.clone(),
                confirmed: rec.cumulative_confirmed,
                deaths: rec.deaths,
                recovered: rec.recovered,
                daily_new,
                moving_average,
            })
            .collect();

        Self {
            region: series.region.clone(),
            window,
            rows,
            revisions,
        }
    }

    pub fn latest(&self) -> Option<&MetricRow> {
        self.rows.last()
    }

    /// Keep only the rows dated within `[from, to]` (inclusive, either bound optional).
    ///
    /// Rows are date-sorted, so the kept rows are one contiguous run. Revisions
    /// outside it are dropped and the rest are re-indexed against the kept rows.
    pub fn within(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        let start = self
            .rows
            .iter()
            .position(|r| from.is_none_or(|f| r.date >= f))
            .unwrap_or(self.rows.len());
        let end = self
            .rows
            .iter()
            .rposition(|r| to.is_none_or(|t| r.date <= t))
            .map_or(0, |i| i + 1)
            .max(start);

        self.rows.truncate(end);
        self.rows.drain(..start);
        self.revisions.retain(|rev| (start..end).contains(&rev.index));
        for rev in &mut self.revisions {
            rev.index -= start;
        }
        self
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    pub data_path: PathBuf,
    pub region: String,
    pub window: usize,
    /// Sum same-date rows (e.g. provinces) into a single row per date.
    pub aggregate: bool,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,

    pub tail: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

/// A saved metrics file (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsFile {
    pub tool: String,
    pub region: String,
    pub window: usize,
    pub generated_from: String,
    pub rows: Vec<MetricRow>,
}
