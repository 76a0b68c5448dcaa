//! CSV ingest and normalization.
//!
//! This module is responsible for turning a cumulative case table (one row per
//! date and region) into clean `TimeSeriesRecord`s.
//!
//! Design goals:
//! - **Strict schema** for required columns (typed `DataSourceError`)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Separation of concerns**: no selection or metric logic here

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::{info, warn};

use crate::domain::TimeSeriesRecord;
use crate::error::DataSourceError;

const DATE_COLUMNS: [&str; 1] = ["date"];
const REGION_COLUMNS: [&str; 3] = ["country/region", "country", "region"];
const CONFIRMED_COLUMNS: [&str; 1] = ["confirmed"];
const SUBREGION_COLUMNS: [&str; 3] = ["province/state", "province", "state"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: records in file order + row errors.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<TimeSeriesRecord>,
    row_errors: Vec<RowError>,
    rows_read: usize,
}

impl Dataset {
    /// Build a dataset from already-parsed records (file order preserved).
    pub fn from_records(records: Vec<TimeSeriesRecord>) -> Self {
        let rows_read = records.len();
        Self {
            records,
            row_errors: Vec::new(),
            rows_read,
        }
    }

    pub fn records(&self) -> &[TimeSeriesRecord] {
        &self.records
    }

    pub fn row_errors(&self) -> &[RowError] {
        &self.row_errors
    }

    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Distinct region identifiers with their record counts, sorted by name.
    pub fn regions(&self) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for r in &self.records {
            *counts.entry(r.region.as_str()).or_default() += 1;
        }
        counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }
}

/// Resolved column positions for one file.
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    region: usize,
    confirmed: usize,
    subregion: Option<usize>,
    deaths: Option<usize>,
    recovered: Option<usize>,
}

/// Load the case table at `path`.
///
/// The path must already be resolved; nothing here searches for files.
pub fn load_dataset(path: &Path) -> Result<Dataset, DataSourceError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => DataSourceError::Missing {
            path: path.to_path_buf(),
        },
        _ => DataSourceError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;
    // Opening a directory succeeds on Unix; reading it would fail later with a csv error.
    let is_dir = file.metadata().is_ok_and(|m| m.is_dir());
    if is_dir {
        return Err(DataSourceError::Unreadable {
            path: path.to_path_buf(),
            source: std::io::Error::other("path is a directory"),
        });
    }

    let dataset = read_dataset(file)?;
    if dataset.records.is_empty() {
        return Err(DataSourceError::Empty {
            path: path.to_path_buf(),
        });
    }

    info!(
        path = %path.display(),
        records = dataset.records.len(),
        rows_read = dataset.rows_read,
        row_errors = dataset.row_errors.len(),
        "ingested case table"
    );
    Ok(dataset)
}

/// Parse a case table from any reader.
///
/// Unlike [`load_dataset`] this accepts a table with zero valid rows.
pub fn read_dataset<R: std::io::Read>(reader: R) -> Result<Dataset, DataSourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|source| DataSourceError::Headers { source })?
        .clone();

    let header_map = build_header_map(&headers);
    let columns = resolve_columns(&header_map)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1, records are 1-based after it.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, columns) {
            Ok(rec) => records.push(rec),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    for err in row_errors.iter().take(5) {
        warn!(line = err.line, "skipped row: {}", err.message);
    }
    if row_errors.len() > 5 {
        warn!(more = row_errors.len() - 5, "additional rows skipped");
    }

    Ok(Dataset {
        records,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports may prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn find_column(header_map: &HashMap<String, usize>, aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|a| header_map.get(*a).copied())
}

fn resolve_columns(header_map: &HashMap<String, usize>) -> Result<Columns, DataSourceError> {
    let date = find_column(header_map, &DATE_COLUMNS).ok_or(DataSourceError::MissingColumn { column: "Date" })?;
    let region = find_column(header_map, &REGION_COLUMNS)
        .ok_or(DataSourceError::MissingColumn { column: "Country/Region" })?;
    let confirmed = find_column(header_map, &CONFIRMED_COLUMNS)
        .ok_or(DataSourceError::MissingColumn { column: "Confirmed" })?;

    Ok(Columns {
        date,
        region,
        confirmed,
        subregion: find_column(header_map, &SUBREGION_COLUMNS),
        deaths: header_map.get("deaths").copied(),
        recovered: header_map.get("recovered").copied(),
    })
}

fn parse_row(record: &StringRecord, columns: Columns) -> Result<TimeSeriesRecord, String> {
    let date = parse_date(get_required(record, columns.date, "Date")?)?;
    let region = get_required(record, columns.region, "Country/Region")?.to_string();
    let cumulative_confirmed = parse_count(get_required(record, columns.confirmed, "Confirmed")?)
        .map_err(|e| format!("Invalid `Confirmed`: {e}"))?;

    let subregion = get_optional(record, columns.subregion).map(str::to_string);
    // Optional count columns are best-effort: unparseable values become None.
    let deaths = get_optional(record, columns.deaths).and_then(|s| parse_count(s).ok());
    let recovered = get_optional(record, columns.recovered).and_then(|s| parse_count(s).ok());

    Ok(TimeSeriesRecord {
        date,
        region,
        subregion,
        cumulative_confirmed,
        deaths,
        recovered,
    })
}

fn get_required<'a>(record: &'a StringRecord, idx: usize, name: &str) -> Result<&'a str, String> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional(record: &StringRecord, idx: Option<usize>) -> Option<&str> {
    record.get(idx?).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // Timestamped dates ("2020-01-22 00:00:00", "2020-01-22T00:00:00") keep only the date part.
    let head = s.split([' ', 'T']).next().unwrap_or(s);

    // chrono's `%Y` accepts a single-digit year, so the layout is picked from
    // the field widths instead of trying formats in turn.
    let year_first = head.split(['-', '/']).next().is_some_and(|p| p.len() == 4);
    let fmt = if year_first {
        if head.contains('/') { "%Y/%m/%d" } else { "%Y-%m-%d" }
    } else {
        match head.rsplit('/').next().map(str::len) {
            Some(2) => "%m/%d/%y",
            _ => "%m/%d/%Y",
        }
    };

    NaiveDate::parse_from_str(head, fmt).map_err(|_| {
        format!("Invalid date '{s}'. Expected one of: YYYY-MM-DD, YYYY/MM/DD, MM/DD/YYYY, M/D/YY.")
    })
}

/// Parse a non-negative count; integral floats such as `"12.0"` are accepted.
fn parse_count(s: &str) -> Result<u64, String> {
    if let Ok(v) = s.parse::<u64>() {
        return Ok(v);
    }
    let v = s.parse::<f64>().map_err(|_| format!("'{s}' is not a number"))?;
    if !v.is_finite() || v < 0.0 {
        return Err(format!("'{s}' must be a finite, non-negative count"));
    }
    if v.fract() != 0.0 || v > u64::MAX as f64 {
        return Err(format!("'{s}' is not a whole count"));
    }
    Ok(v as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Date,Country/Region,Province/State,Confirmed,Recovered,Deaths
2020-01-22,India,,0,0,0
2020-01-23,India,,1,0,0
2020-01-22,Australia,Victoria,2,,0
2020-01-24,India,,-4,0,0
2020-01-25,India,,3.0,0,0
not-a-date,India,,3,0,0
";

    #[test]
    fn reads_records_in_file_order_and_skips_bad_rows() {
        let ds = read_dataset(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.rows_read(), 6);
        assert_eq!(ds.records().len(), 4);
        assert_eq!(ds.row_errors().len(), 2);
        assert_eq!(ds.row_errors()[0].line, 5);
        assert_eq!(ds.row_errors()[1].line, 7);

        let au = &ds.records()[2];
        assert_eq!(au.region, "Australia");
        assert_eq!(au.subregion.as_deref(), Some("Victoria"));
        assert_eq!(au.recovered, None);
        assert_eq!(au.deaths, Some(0));

        assert_eq!(ds.records()[3].cumulative_confirmed, 3);
    }

    #[test]
    fn regions_are_counted_and_sorted() {
        let ds = read_dataset(SAMPLE.as_bytes()).unwrap();
        assert_eq!(
            ds.regions(),
            vec![("Australia".to_string(), 1), ("India".to_string(), 3)]
        );
    }

    #[test]
    fn header_lookup_is_case_insensitive_and_bom_tolerant() {
        let csv = "\u{feff}DATE,country,CONFIRMED\n2020-02-01,Chile,7\n";
        let ds = read_dataset(csv.as_bytes()).unwrap();
        assert_eq!(ds.records()[0].region, "Chile");
        assert_eq!(ds.records()[0].cumulative_confirmed, 7);
    }

    #[test]
    fn missing_confirmed_column_is_fatal() {
        let csv = "Date,Country/Region,Deaths\n2020-01-22,India,0\n";
        let err = read_dataset(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataSourceError::MissingColumn { column: "Confirmed" }));
    }

    #[test]
    fn missing_file_is_a_typed_error() {
        let err = load_dataset(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DataSourceError::Missing { .. }));
    }

    #[test]
    fn date_formats() {
        let expected = NaiveDate::from_ymd_opt(2020, 3, 9).unwrap();
        assert_eq!(parse_date("2020-03-09").unwrap(), expected);
        assert_eq!(parse_date("2020/03/09").unwrap(), expected);
        assert_eq!(parse_date("03/09/2020").unwrap(), expected);
        assert_eq!(parse_date("3/9/20").unwrap(), expected);
        assert_eq!(parse_date("03/09/20").unwrap(), expected);
        assert_eq!(parse_date("2020-03-09 00:00:00").unwrap(), expected);
        assert_eq!(parse_date("2020-03-09T00:00:00").unwrap(), expected);
        assert!(parse_date("9 March").is_err());
    }

    #[test]
    fn short_us_dates_land_in_the_right_century() {
        assert_eq!(parse_date("12/1/20").unwrap(), NaiveDate::from_ymd_opt(2020, 12, 1).unwrap());
        assert_eq!(parse_date("1/22/20").unwrap(), NaiveDate::from_ymd_opt(2020, 1, 22).unwrap());
        assert_eq!(parse_date("12/31/2021").unwrap(), NaiveDate::from_ymd_opt(2021, 12, 31).unwrap());
        // Two-digit leading fields never read as a year.
        assert!(parse_date("20/3/9").is_err());
    }

    #[test]
    fn table_with_only_bad_rows_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad_rows.csv");
        std::fs::write(&path, "Date,Country/Region,Confirmed
yesterday,India,1
2020-01-22,India,-3
").unwrap();
        let err = load_dataset(&path).unwrap_err();
        assert!(matches!(err, DataSourceError::Empty { .. }));
    }

    #[test]
    fn directory_path_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(dir.path()).unwrap_err();
        assert!(matches!(err, DataSourceError::Unreadable { .. }));
    }

    #[test]
    fn non_utf8_header_is_a_header_error() {
        let bytes: &[u8] = b"Da\xffte,Country/Region,Confirmed\n2020-01-22,India,1\n";
        let err = read_dataset(bytes).unwrap_err();
        assert!(matches!(err, DataSourceError::Headers { .. }));
    }

    #[test]
    fn counts_reject_negative_and_fractional_values() {
        assert_eq!(parse_count("42").unwrap(), 42);
        assert_eq!(parse_count("42.0").unwrap(), 42);
        assert!(parse_count("-1").is_err());
        assert!(parse_count("1.5").is_err());
        assert!(parse_count("NaN").is_err());
        assert!(parse_count("many").is_err());
    }
}
