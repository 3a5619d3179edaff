//! CSV loading for the navpick CLI.
//!
//! Rows are read leniently: a row with a bad date or a non-numeric value is
//! dropped rather than failing the whole file. The surviving rows go through
//! a polars frame into [`MarketData`], which applies the price series
//! invariants (ascending dates, last duplicate wins, positive values).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use navpick::{Candidate, MarketData, PriceSeries};
use polars::prelude::*;
use serde::Deserialize;
use tracing::{debug, warn};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

#[derive(Debug, Deserialize)]
struct PriceRow {
    id: String,
    date: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct ValueRow {
    date: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct PoolRow {
    id: String,
    name: Option<String>,
}

/// Parse a date in `YYYY-MM-DD`, `YYYY/MM/DD` or `YYYYMMDD` form.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s.trim(), fmt).ok())
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input)
}

/// Load a long-format `id,date,value` file into one series per id.
pub(crate) fn load_prices(path: &Path) -> Result<Vec<PriceSeries>> {
    read_prices(open(path)?).with_context(|| format!("Failed to read prices: {}", path.display()))
}

/// Load a single `date,value` series, identified by `id`.
pub(crate) fn load_series(path: &Path, id: &str) -> Result<PriceSeries> {
    read_series(open(path)?, id).with_context(|| format!("Failed to read series: {}", path.display()))
}

/// Load an `id,name` candidate pool file.
pub(crate) fn load_pool(path: &Path) -> Result<Vec<(String, String)>> {
    read_pool(open(path)?).with_context(|| format!("Failed to read pool: {}", path.display()))
}

pub(crate) fn read_prices<R: Read>(input: R) -> Result<Vec<PriceSeries>> {
    let mut ids = Vec::new();
    let mut dates = Vec::new();
    let mut values = Vec::new();
    let mut dropped = 0usize;

    for row in reader(input).deserialize::<PriceRow>() {
        let Ok(row) = row else {
            dropped += 1;
            continue;
        };
        match (parse_date(&row.date), row.value.parse::<f64>()) {
            (Some(date), Ok(value)) if !row.id.is_empty() => {
                ids.push(row.id);
                dates.push(date);
                values.push(value);
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!(dropped, "unparseable price rows dropped");
    }

    let frame = df!(
        "id" => ids,
        "date" => dates,
        "value" => values,
    )?;
    let series = MarketData::new(frame).split_by_id("id", "date", "value")?;
    debug!(series = series.len(), "prices loaded");
    Ok(series)
}

pub(crate) fn read_series<R: Read>(input: R, id: &str) -> Result<PriceSeries> {
    let mut dates = Vec::new();
    let mut values = Vec::new();
    let mut dropped = 0usize;

    for row in reader(input).deserialize::<ValueRow>() {
        let parsed = row
            .ok()
            .and_then(|r| Some((parse_date(&r.date)?, r.value.parse::<f64>().ok()?)));
        match parsed {
            Some((date, value)) => {
                dates.push(date);
                values.push(value);
            }
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!(id, dropped, "unparseable rows dropped");
    }

    let frame = df!("date" => dates, "value" => values)?;
    Ok(MarketData::new(frame).price_series(id, "date", "value")?)
}

pub(crate) fn read_pool<R: Read>(input: R) -> Result<Vec<(String, String)>> {
    let mut pool = Vec::new();
    for row in reader(input).deserialize::<PoolRow>() {
        let row = row.context("Malformed pool row")?;
        let name = row.name.filter(|n| !n.is_empty()).unwrap_or_else(|| row.id.clone());
        pool.push((row.id, name));
    }
    Ok(pool)
}

/// Pair pool entries with their price series.
///
/// Without a pool every loaded series becomes a candidate named after its id.
/// Pool entries with no prices get an empty series and are reported as
/// skipped by the pipeline.
pub(crate) fn candidates(
    series: Vec<PriceSeries>,
    pool: Option<Vec<(String, String)>>,
) -> Vec<Candidate> {
    let Some(pool) = pool else {
        return series
            .into_iter()
            .map(|s| Candidate::new(s.id().to_string(), s.id().to_string(), s))
            .collect();
    };

    let mut by_id: std::collections::HashMap<String, PriceSeries> = series
        .into_iter()
        .map(|s| (s.id().to_string(), s))
        .collect();

    pool.into_iter()
        .map(|(id, name)| {
            let series = by_id.remove(&id).unwrap_or_else(|| {
                warn!(%id, "no prices for pool member");
                PriceSeries::new(id.clone(), [])
            });
            Candidate::new(id, name, series)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_date_formats() {
        let date = parse_date("2024-01-15").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 1, 15));
        assert_eq!(parse_date("2024/01/15"), Some(date));
        assert_eq!(parse_date("20240115"), Some(date));
        assert_eq!(parse_date("invalid"), None);
    }

    #[test]
    fn test_read_prices_long_format() {
        let csv = "id,date,value\n\
                   B,2024-01-03,2.0\n\
                   A,2024-01-02,1.0\n\
                   A,2024-01-01,0.9\n\
                   B,2024-01-02,1.9\n\
                   A,not-a-date,5.0\n\
                   A,2024-01-04,abc\n\
                   B,2024-01-04,-1.0\n\
                   A,2024-01-02,1.1\n";
        let series = read_prices(csv.as_bytes()).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].id(), "B");
        assert_eq!(series[0].values(), vec![1.9, 2.0]);
        assert_eq!(series[1].id(), "A");
        // ascending, last duplicate wins
        assert_eq!(series[1].values(), vec![0.9, 1.1]);
    }

    #[test]
    fn test_read_series() {
        let csv = "date,value\n2024-01-02,3000.5\n2024-01-01,2990.0\n,\n";
        let series = read_series(csv.as_bytes(), "sh000300").unwrap();
        assert_eq!(series.id(), "sh000300");
        assert_eq!(series.values(), vec![2990.0, 3000.5]);
    }

    #[test]
    fn test_read_pool_defaults_name_to_id() {
        let csv = "id,name\n512480,Semiconductor ETF\n159915,\n";
        let pool = read_pool(csv.as_bytes()).unwrap();
        assert_eq!(
            pool,
            vec![
                ("512480".to_string(), "Semiconductor ETF".to_string()),
                ("159915".to_string(), "159915".to_string()),
            ]
        );
    }

    #[test]
    fn test_candidates_follow_pool_order() {
        let csv = "id,date,value\nA,2024-01-01,1.0\nB,2024-01-01,2.0\n";
        let series = read_prices(csv.as_bytes()).unwrap();
        let pool = vec![
            ("B".to_string(), "Bravo".to_string()),
            ("Z".to_string(), "Missing".to_string()),
        ];

        let candidates = candidates(series, Some(pool));
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, "B");
        assert_eq!(candidates[0].name, "Bravo");
        assert!(candidates[1].series.is_empty());
    }
}
