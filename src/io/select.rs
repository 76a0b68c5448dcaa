//! Region selection.
//!
//! Filters a `Dataset` down to one region's chronologically sorted series.
//! An unknown region is an ordinary outcome and comes back as `None`.

use crate::domain::{RegionSeries, TimeSeriesRecord};
use crate::io::ingest::Dataset;

/// Optional refinements applied on top of the region filter.
///
/// Date windows are not a selection concern: they trim the derived table
/// (`RegionMetrics::within`) so the first kept delta still sees the day before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectOptions {
    /// Sum same-date rows into a single row per date.
    pub aggregate: bool,
}

/// Select every row of `region`, sorted by date (stable: ties keep file order).
pub fn select_region(dataset: &Dataset, region: &str) -> Option<RegionSeries> {
    select_region_with(dataset, region, SelectOptions::default())
}

/// Select `region` and apply `opts`.
///
/// Returns `None` when the region has no rows.
pub fn select_region_with(dataset: &Dataset, region: &str, opts: SelectOptions) -> Option<RegionSeries> {
    let region = region.trim();
    let mut records: Vec<TimeSeriesRecord> = dataset
        .records()
        .iter()
        .filter(|r| r.region == region)
        .cloned()
        .collect();

    if records.is_empty() {
        return None;
    }

    records.sort_by_key(|r| r.date);

    if opts.aggregate {
        records = aggregate_by_date(records);
    }

    Some(RegionSeries {
        region: region.to_string(),
        records,
    })
}

/// Collapse runs of equal dates into one record by summing the counts.
///
/// Expects `records` sorted by date. Sub-region labels are dropped from merged rows.
fn aggregate_by_date(records: Vec<TimeSeriesRecord>) -> Vec<TimeSeriesRecord> {
    let mut out: Vec<TimeSeriesRecord> = Vec::with_capacity(records.len());
    for rec in records {
        match out.last_mut() {
            Some(last) if last.date == rec.date => {
                last.cumulative_confirmed = last.cumulative_confirmed.saturating_add(rec.cumulative_confirmed);
                last.deaths = sum_optional(last.deaths, rec.deaths);
                last.recovered = sum_optional(last.recovered, rec.recovered);
                last.subregion = None;
            }
            _ => out.push(rec),
        }
    }
    out
}

fn sum_optional(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.saturating_add(y)),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(date: (i32, u32, u32), region: &str, sub: Option<&str>, confirmed: u64) -> TimeSeriesRecord {
        TimeSeriesRecord {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            region: region.to_string(),
            subregion: sub.map(str::to_string),
            cumulative_confirmed: confirmed,
            deaths: Some(0),
            recovered: None,
        }
    }

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            rec((2020, 1, 24), "India", None, 3),
            rec((2020, 1, 22), "India", None, 1),
            rec((2020, 1, 22), "Australia", Some("Victoria"), 2),
            rec((2020, 1, 23), "India", None, 2),
            rec((2020, 1, 22), "Australia", Some("New South Wales"), 5),
            rec((2020, 1, 23), "Australia", Some("Victoria"), 4),
        ])
    }

    #[test]
    fn unknown_region_is_none() {
        assert!(select_region(&dataset(), "Atlantis").is_none());
    }

    #[test]
    fn selection_is_sorted_by_date() {
        let s = select_region(&dataset(), "India").unwrap();
        assert_eq!(s.region, "India");
        assert_eq!(s.cumulative(), vec![1, 2, 3]);
    }

    #[test]
    fn ties_keep_ingestion_order() {
        let s = select_region(&dataset(), " Australia ").unwrap();
        let subs: Vec<_> = s.records.iter().map(|r| r.subregion.as_deref()).collect();
        assert_eq!(subs, vec![Some("Victoria"), Some("New South Wales"), Some("Victoria")]);
    }

    #[test]
    fn aggregate_sums_same_date_rows() {
        let opts = SelectOptions {
            aggregate: true,
            ..SelectOptions::default()
        };
        let s = select_region_with(&dataset(), "Australia", opts).unwrap();
        assert_eq!(s.cumulative(), vec![7, 4]);
        assert_eq!(s.records[0].subregion, None);
        assert_eq!(s.records[0].deaths, Some(0));
        assert_eq!(s.records[1].subregion.as_deref(), Some("Victoria"));
    }
}
