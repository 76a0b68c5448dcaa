//! Command-line parsing for the case-velocity tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the metric code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "epi", version, about = "Daily new cases and 7-day averages from cumulative case tables")]
pub struct Cli {
    /// Case table CSV (falls back to EPI_DATA_PATH, also read from `.env`).
    #[arg(long, global = true, value_name = "CSV")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Derive daily new cases and the moving average for one region.
    Metrics(MetricsArgs),
    /// List regions in the data file with their row counts.
    Regions,
    /// Plot a previously exported metrics JSON.
    Plot(PlotArgs),
}

/// Options for `epi metrics`.
#[derive(Debug, Parser, Clone)]
pub struct MetricsArgs {
    /// Region (country) to analyze, matched exactly.
    #[arg(short = 'c', long, visible_alias = "country")]
    pub region: String,

    /// Moving-average window width (days).
    #[arg(long, default_value_t = 7)]
    pub window: usize,

    /// Sum rows sharing a date (e.g. provinces) before deriving.
    #[arg(long)]
    pub aggregate: bool,

    /// First date to include (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last date to include (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Number of trailing rows to print.
    #[arg(long, default_value_t = 10)]
    pub tail: usize,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the augmented table to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the augmented table to JSON (re-plot with `epi plot`).
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Options for plotting a saved metrics file.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Metrics JSON file produced by `epi metrics --export-json`.
    #[arg(long, value_name = "JSON")]
    pub metrics: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}
