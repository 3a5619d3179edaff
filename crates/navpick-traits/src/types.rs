//! Common types used throughout navpick.
//!
//! This module defines the records that flow between the engines: single
//! price observations, feature records, scored candidates, and the
//! DataFrame-backed [`MarketData`] container used at ingestion.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{CE_TO_UNIX_EPOCH_DAYS, NavpickError, PriceSeries, Result};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A security identifier, typically a fund or ETF code such as "512480".
pub type Symbol = String;

/// One end-of-day valuation (NAV or close).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Valuation date.
    pub date: Date,
    /// Price; finite and positive once inside a [`PriceSeries`].
    pub value: f64,
}

impl PricePoint {
    /// Creates a new price point.
    pub const fn new(date: Date, value: f64) -> Self {
        Self { date, value }
    }
}

/// Windowed technical features of one security as of its last observation.
///
/// All fields are derived deterministically from a single price series
/// snapshot. Windows are in trading days (observations), not calendar days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Return over the last `hold_days` observations.
    pub ret_hold: f64,
    /// Return over the last 20 observations.
    pub ret_20: f64,
    /// Sample standard deviation of the last 20 daily returns.
    pub vol_20: f64,
    /// Maximum drawdown inside the last 20 prices, always `<= 0`.
    pub mdd_20: f64,
    /// Fraction of the last 20 daily returns that are strictly positive.
    pub pos_ratio_20: f64,
    /// Mean of the last 20 prices.
    pub ma_20: f64,
    /// Relative deviation of the last price from `ma_20`.
    pub bias_20: f64,
    /// Excess of `bias_20` over the bias threshold, floored at zero.
    pub bias_20_over: f64,
    /// Excess of `ret_hold` over the soft cap, floored at zero.
    pub ret_hold_over_cap: f64,
}

/// A pool member handed to the engine by the upstream candidate producer.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Security identifier.
    pub id: Symbol,
    /// Display name.
    pub name: String,
    /// Cleaned price history.
    pub series: PriceSeries,
}

impl Candidate {
    /// Creates a candidate from its id, name, and price history.
    pub fn new(id: impl Into<Symbol>, name: impl Into<String>, series: PriceSeries) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            series,
        }
    }
}

/// A candidate after feature extraction and scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// Security identifier.
    pub id: Symbol,
    /// Display name.
    pub name: String,
    /// Features the score was computed from.
    pub features: FeatureSet,
    /// Up/down bitstring, newest day first (`'1'` = up).
    pub pattern: Option<String>,
    /// Composite score; larger ranks first.
    pub score: f64,
}

/// Container for tabular market data.
///
/// `MarketData` wraps a Polars DataFrame and converts it into validated
/// [`PriceSeries`] values. Field access is checked once here so the engines
/// only ever see strongly-typed series.
///
/// # Expected Schema
///
/// - a `Date`-typed column holding the valuation date
/// - a numeric column holding the price
/// - for long-format frames, a string column holding the security id
///
/// # Example
///
/// ```no_run
/// use navpick_traits::MarketData;
/// use polars::prelude::*;
///
/// let df = DataFrame::default();
/// let market_data = MarketData::new(df);
/// let series = market_data.split_by_id("id", "date", "value");
/// ```
#[derive(Debug, Clone)]
pub struct MarketData {
    data: DataFrame,
}

impl MarketData {
    /// Creates a new `MarketData` instance from a DataFrame.
    pub const fn new(data: DataFrame) -> Self {
        Self { data }
    }

    /// Returns a reference to the underlying DataFrame.
    pub const fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Returns the number of rows in the market data.
    pub fn len(&self) -> usize {
        self.data.height()
    }

    /// Returns whether the market data is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Checks if a column exists in the market data.
    pub fn has_column(&self, name: &str) -> bool {
        self.data
            .get_column_names()
            .iter()
            .any(|s| s.as_str() == name)
    }

    /// Builds one price series from a single-instrument frame.
    ///
    /// Rows with a null date or a null, non-finite, or non-positive value are
    /// dropped; the remainder is sorted and de-duplicated by
    /// [`PriceSeries::new`].
    ///
    /// # Errors
    ///
    /// Returns an error if either column is missing or has the wrong dtype.
    pub fn price_series(
        &self,
        id: impl Into<Symbol>,
        date_col: &str,
        value_col: &str,
    ) -> Result<PriceSeries> {
        let dates = self.dates(date_col)?;
        let values = self.values(value_col)?;

        let points = dates
            .into_iter()
            .zip(values)
            .filter_map(|(date, value)| Some(PricePoint::new(date?, value?)));

        Ok(PriceSeries::new(id, points))
    }

    /// Splits a long-format frame into one price series per id.
    ///
    /// Series are returned in order of first appearance of their id.
    ///
    /// # Errors
    ///
    /// Returns an error if a column is missing or has the wrong dtype.
    pub fn split_by_id(
        &self,
        id_col: &str,
        date_col: &str,
        value_col: &str,
    ) -> Result<Vec<PriceSeries>> {
        let ids: Vec<Option<String>> = self
            .require(id_col)?
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|s: Option<&str>| s.map(str::to_string))
            .collect();
        let dates = self.dates(date_col)?;
        let values = self.values(value_col)?;

        let mut order: Vec<Symbol> = Vec::new();
        let mut grouped: std::collections::HashMap<Symbol, Vec<PricePoint>> =
            std::collections::HashMap::new();

        for ((id, date), value) in ids.into_iter().zip(dates).zip(values) {
            let (Some(id), Some(date), Some(value)) = (id, date, value) else {
                continue;
            };
            let points = grouped.entry(id.clone()).or_insert_with(|| {
                order.push(id);
                Vec::new()
            });
            points.push(PricePoint::new(date, value));
        }

        Ok(order
            .into_iter()
            .map(|id| {
                let points = grouped.remove(&id).unwrap_or_default();
                PriceSeries::new(id, points)
            })
            .collect())
    }

    fn require(&self, name: &str) -> Result<&Column> {
        self.data
            .column(name)
            .map_err(|_| NavpickError::MissingColumn(name.to_string()))
    }

    fn dates(&self, name: &str) -> Result<Vec<Option<Date>>> {
        let dates = self
            .require(name)?
            .as_materialized_series()
            .date()?
            .into_iter()
            .map(|d: Option<i32>| {
                d.and_then(|d| Date::from_num_days_from_ce_opt(d + CE_TO_UNIX_EPOCH_DAYS))
            })
            .collect();
        Ok(dates)
    }

    fn values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let series = self
            .require(name)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        let values = series.f64()?.into_iter().collect();
        Ok(values)
    }
}

impl From<DataFrame> for MarketData {
    fn from(data: DataFrame) -> Self {
        Self::new(data)
    }
}
