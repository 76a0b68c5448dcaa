//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the data file
//! - runs ingest + selection + derivation
//! - prints reports/plots
//! - writes optional exports

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{Command, MetricsArgs, PlotArgs};
use crate::config::resolve_data_path;
use crate::domain::MetricsConfig;
use crate::error::{AppError, EXIT_INPUT, EXIT_NO_DATA};

pub mod pipeline;

/// Entry point for the `epi` binary.
pub fn run() -> Result<(), AppError> {
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Metrics(args) => handle_metrics(cli.data, args),
        Command::Regions => handle_regions(cli.data),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_metrics(data: Option<PathBuf>, args: MetricsArgs) -> Result<(), AppError> {
    let data_path = resolve_data_path(data)?;
    let config = metrics_config_from_args(&args, data_path)?;

    let Some(run) = pipeline::run_metrics(&config)? else {
        return Err(AppError::new(
            EXIT_NO_DATA,
            format!("No data found for region: {}", config.region),
        ));
    };

    println!("{}", crate::report::format_summary(&run.summary, &run.dataset));
    if config.tail > 0 {
        println!("{}", crate::report::format_tail(&run.metrics, config.tail));
    }

    if config.plot {
        let plot = crate::plot::render_series_plot(&run.metrics.rows, config.plot_width, config.plot_height);
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_csv {
        crate::io::export::write_metrics_csv(path, &run.metrics)?;
    }
    if let Some(path) = &config.export_json {
        crate::io::snapshot::write_metrics_json(path, &run.metrics, &config.data_path)?;
    }

    Ok(())
}

fn handle_regions(data: Option<PathBuf>) -> Result<(), AppError> {
    let data_path = resolve_data_path(data)?;
    let dataset = crate::io::ingest::load_dataset(&data_path)?;
    print!("{}", crate::report::format_regions(&dataset.regions()));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let saved = crate::io::snapshot::read_metrics_json(&args.metrics)?;

    println!("Region: {} ({}-day average)", saved.region, saved.window);
    let plot = crate::plot::render_series_plot(&saved.rows, args.width, args.height);
    println!("{plot}");
    Ok(())
}

pub fn metrics_config_from_args(args: &MetricsArgs, data_path: PathBuf) -> Result<MetricsConfig, AppError> {
    if args.window == 0 {
        return Err(AppError::new(EXIT_INPUT, "`--window` must be at least 1."));
    }
    if let (Some(from), Some(to)) = (args.from, args.to) {
        if from > to {
            return Err(AppError::new(
                EXIT_INPUT,
                format!("`--from` ({from}) is after `--to` ({to})."),
            ));
        }
    }
    if args.region.trim().is_empty() {
        return Err(AppError::new(EXIT_INPUT, "`--region` must not be empty."));
    }

    Ok(MetricsConfig {
        data_path,
        region: args.region.trim().to_string(),
        window: args.window,
        aggregate: args.aggregate,
        date_from: args.from,
        date_to: args.to,
        tail: args.tail,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_csv: args.export.clone(),
        export_json: args.export_json.clone(),
    })
}

/// Rewrite argv so `epi -c India` means `epi metrics -c India`.
///
/// Rules:
/// - `epi`                          -> unchanged (clap prints usage)
/// - `epi -c India ...`             -> `epi metrics -c India ...`
/// - `epi --data f.csv regions`     -> unchanged (subcommand present)
/// - `epi --help/--version/-h`      -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if first_positional(&argv).is_some_and(|a| matches!(a, "metrics" | "regions" | "plot")) {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "metrics".to_string());
    }
    argv
}

/// Options that consume the following token as their value.
const VALUE_FLAGS: [&str; 13] = [
    "--data",
    "-c",
    "--region",
    "--country",
    "--window",
    "--from",
    "--to",
    "--tail",
    "--width",
    "--height",
    "--export",
    "--export-json",
    "--metrics",
];

/// First token after the binary name that is neither a flag nor a flag's value.
fn first_positional(argv: &[String]) -> Option<&str> {
    let mut tokens = argv.iter().skip(1).map(String::as_str);
    while let Some(tok) = tokens.next() {
        if VALUE_FLAGS.contains(&tok) {
            tokens.next();
        } else if !tok.starts_with('-') {
            return Some(tok);
        }
    }
    None
}
