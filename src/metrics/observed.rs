//! Logging wrapper around the pure transform.
//!
//! `derive` itself stays free of side effects; this wrapper is what the
//! pipeline calls so that reporting corrections show up in the logs.

use tracing::{debug, info, warn};

use crate::domain::{RegionMetrics, RegionSeries};
use crate::metrics::derive::{derive_with_window, revisions, SMOOTHING_WINDOW};

#[derive(Debug, Clone, Copy)]
pub struct ObservedDeriver {
    window: usize,
}

impl Default for ObservedDeriver {
    fn default() -> Self {
        Self::new(SMOOTHING_WINDOW)
    }
}

impl ObservedDeriver {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// Derive metrics for one region and assemble the augmented table.
    pub fn run(&self, series: &RegionSeries) -> RegionMetrics {
        let span = tracing::debug_span!("derive", region = %series.region, rows = series.len());
        let _guard = span.enter();

        let cumulative = series.cumulative();
        let derived = derive_with_window(&cumulative, self.window);
        let revisions = revisions(&cumulative);

        for rev in &revisions {
            let date = series.records.get(rev.index).map(|r| r.date);
            warn!(
                region = %series.region,
                index = rev.index,
                date = ?date,
                previous = rev.previous,
                current = rev.current,
                decline = rev.decline(),
                "cumulative count decreased; daily value clamped to 0"
            );
        }

        let metrics = RegionMetrics::assemble(series, &derived, self.window, revisions);
        match metrics.latest() {
            Some(last) => info!(
                region = %metrics.region,
                rows = metrics.rows.len(),
                latest_date = %last.date,
                latest_daily_new = last.daily_new,
                latest_moving_average = last.moving_average,
                "derived metrics"
            ),
            None => debug!(region = %metrics.region, "empty series; nothing derived"),
        }
        metrics
    }
}
