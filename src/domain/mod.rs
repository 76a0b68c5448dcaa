//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - ingested observations (`TimeSeriesRecord`) and per-region selections (`RegionSeries`)
//! - derived outputs (`DerivedSeries`, `MetricRow`, `RegionMetrics`)
//! - run configuration (`MetricsConfig`) and the saved JSON schema (`MetricsFile`)

pub mod types;

pub use types::*;
