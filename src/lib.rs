//! `epi-velocity` library crate.
//!
//! The binary (`epi`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the metric transform can be reused without the CSV/CLI layers

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod metrics;
pub mod plot;
pub mod report;

pub use domain::{DerivedSeries, RegionMetrics, RegionSeries, TimeSeriesRecord};
pub use error::{AppError, DataSourceError};
pub use io::{Dataset, load_dataset, select_region};
pub use metrics::{derive, derive_with_window};
