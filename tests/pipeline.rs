//! End-to-end: CSV on disk -> selection -> derivation -> exports.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use epi_velocity::app::pipeline::{run_metrics, run_metrics_on};
use epi_velocity::domain::MetricsConfig;
use epi_velocity::error::{DataSourceError, EXIT_INPUT};
use epi_velocity::io::{read_metrics_json, write_metrics_csv, write_metrics_json};
use epi_velocity::{derive, load_dataset, select_region};

const CASES: &str = "\
Date,Country/Region,Province/State,Confirmed,Recovered,Deaths
2020-03-01,India,,3,0,0
2020-03-02,India,,5,0,0
2020-03-03,India,,5,0,0
2020-03-04,India,,28,0,0
2020-03-05,India,,30,0,0
2020-03-06,India,,31,0,0
2020-03-07,India,,34,0,0
2020-03-08,India,,39,0,0
2020-03-09,India,,43,0,0
2020-03-10,India,,56,0,0
2020-03-01,Australia,Victoria,1,0,0
2020-03-01,Australia,Queensland,2,0,0
2020-03-02,Australia,Victoria,1,0,0
2020-03-02,Australia,Queensland,4,0,0
";

fn write_cases(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("time-series-19-covid-combined.csv");
    fs::write(&path, CASES).unwrap();
    path
}

fn config(data_path: PathBuf, region: &str) -> MetricsConfig {
    MetricsConfig {
        data_path,
        region: region.to_string(),
        window: 7,
        aggregate: false,
        date_from: None,
        date_to: None,
        tail: 10,
        plot: false,
        plot_width: 80,
        plot_height: 10,
        export_csv: None,
        export_json: None,
    }
}

#[test]
fn india_series_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_cases(&dir);

    let run = run_metrics(&config(path, "India")).unwrap().unwrap();
    let daily: Vec<u64> = run.metrics.rows.iter().map(|r| r.daily_new).collect();
    assert_eq!(daily, vec![3, 2, 0, 23, 2, 1, 3, 5, 4, 13]);

    // Interior point: window [0..=6].
    let expected = (3 + 2 + 23 + 2 + 1 + 3) as f64 / 7.0;
    assert!((run.metrics.rows[3].moving_average - expected).abs() < 1e-12);

    // Last point: window [6..=9] plus three zero-padded slots.
    let expected_last = (3 + 5 + 4 + 13) as f64 / 7.0;
    assert!((run.summary.latest_moving_average - expected_last).abs() < 1e-12);
    assert_eq!(run.summary.total_new, 56);
}

#[test]
fn unknown_region_is_an_ordinary_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_cases(&dir);
    assert!(run_metrics(&config(path, "Atlantis")).unwrap().is_none());
}

#[test]
fn missing_file_is_a_typed_data_source_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_dataset(&dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, DataSourceError::Missing { .. }));

    let err = run_metrics(&config(dir.path().join("nope.csv"), "India")).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_INPUT);
}

#[test]
fn missing_column_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_confirmed.csv");
    fs::write(&path, "Date,Country/Region,Deaths\n2020-03-01,India,0\n").unwrap();
    let err = load_dataset(&path).unwrap_err();
    assert!(matches!(err, DataSourceError::MissingColumn { column: "Confirmed" }));
}

#[test]
fn provinces_interleave_unless_aggregated() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_cases(&dir);
    let dataset = load_dataset(&path).unwrap();

    let raw = select_region(&dataset, "Australia").unwrap();
    assert_eq!(raw.cumulative(), vec![1, 2, 1, 4]);
    assert_eq!(derive(&raw.cumulative()).daily_new, vec![1, 1, 0, 3]);

    let mut cfg = config(path, "Australia");
    cfg.aggregate = true;
    let run = run_metrics_on(dataset, &cfg).unwrap();
    let confirmed: Vec<u64> = run.metrics.rows.iter().map(|r| r.confirmed).collect();
    assert_eq!(confirmed, vec![3, 5]);
    assert_eq!(run.metrics.rows[1].daily_new, 2);
}

#[test]
fn date_window_trims_after_deriving() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_cases(&dir);
    let full = run_metrics(&config(path.clone(), "India")).unwrap().unwrap();

    let mut cfg = config(path, "India");
    cfg.date_from = NaiveDate::from_ymd_opt(2020, 3, 4);
    cfg.date_to = NaiveDate::from_ymd_opt(2020, 3, 6);
    let run = run_metrics(&cfg).unwrap().unwrap();

    let daily: Vec<u64> = run.metrics.rows.iter().map(|r| r.daily_new).collect();
    assert_eq!(daily, vec![23, 2, 1]);
    // The averages still see the days outside the window.
    assert_eq!(run.metrics.rows[..], full.metrics.rows[3..6]);
    assert_eq!(run.summary.total_new, 26);
}

#[test]
fn exports_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_cases(&dir);
    let run = run_metrics(&config(path.clone(), "India")).unwrap().unwrap();

    let csv_path = dir.path().join("india.csv");
    write_metrics_csv(&csv_path, &run.metrics).unwrap();
    let text = fs::read_to_string(&csv_path).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("date,region,subregion,confirmed,deaths,recovered,daily_new,moving_average_7d")
    );
    assert_eq!(lines.next(), Some("2020-03-01,India,,3,0,0,3,4.0000"));
    assert_eq!(text.lines().count(), 11);

    let json_path = dir.path().join("india.json");
    write_metrics_json(&json_path, &run.metrics, &path).unwrap();
    let saved = read_metrics_json(&json_path).unwrap();
    assert_eq!(saved.region, "India");
    assert_eq!(saved.window, 7);
    assert_eq!(saved.rows.len(), 10);
    let daily: Vec<u64> = saved.rows.iter().map(|r| r.daily_new).collect();
    assert_eq!(daily, vec![3, 2, 0, 23, 2, 1, 3, 5, 4, 13]);
}
