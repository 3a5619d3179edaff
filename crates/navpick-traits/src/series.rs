//! Validated price series and the return series derived from them.

use serde::{Deserialize, Serialize};

use crate::{Date, PricePoint, Symbol};

/// Time-ordered price history of one instrument.
///
/// Invariants, enforced by [`PriceSeries::new`]:
/// - points are sorted ascending by date
/// - dates are unique (the last occurrence of a date wins)
/// - every value is finite and strictly positive
///
/// The engines treat a series as immutable input; derived columns such as
/// daily returns are computed into new values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    id: Symbol,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series from raw points, dropping invalid values and enforcing
    /// ascending unique dates.
    ///
    /// # Example
    ///
    /// ```
    /// use navpick_traits::{Date, PricePoint, PriceSeries};
    ///
    /// let d = |day| Date::from_ymd_opt(2024, 1, day).unwrap();
    /// let series = PriceSeries::new(
    ///     "510300",
    ///     vec![
    ///         PricePoint::new(d(2), 1.02),
    ///         PricePoint::new(d(1), 1.00),
    ///         PricePoint::new(d(3), f64::NAN),
    ///     ],
    /// );
    /// assert_eq!(series.len(), 2);
    /// assert_eq!(series.values(), vec![1.00, 1.02]);
    /// ```
    pub fn new(id: impl Into<Symbol>, points: impl IntoIterator<Item = PricePoint>) -> Self {
        let mut points: Vec<PricePoint> = points
            .into_iter()
            .filter(|p| p.value.is_finite() && p.value > 0.0)
            .collect();

        // stable: equal dates keep their input order, so the last one wins below
        points.sort_by_key(|p| p.date);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        Self {
            id: id.into(),
            points: deduped,
        }
    }

    /// Builds a series from `(date, value)` pairs.
    pub fn from_pairs(id: impl Into<Symbol>, pairs: impl IntoIterator<Item = (Date, f64)>) -> Self {
        Self::new(
            id,
            pairs
                .into_iter()
                .map(|(date, value)| PricePoint::new(date, value)),
        )
    }

    /// Instrument identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All observations, oldest first.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Oldest observation.
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// Latest observation.
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Prices, oldest first.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Dates, oldest first.
    pub fn dates(&self) -> Vec<Date> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Day-over-day percentage changes keyed by the later date.
    ///
    /// The first observation has no predecessor and produces no return.
    pub fn daily_returns(&self) -> ReturnSeries {
        let points = self
            .points
            .windows(2)
            .map(|w| (w[1].date, w[1].value / w[0].value - 1.0))
            .collect();
        ReturnSeries { points }
    }
}

/// Daily returns keyed by date, ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    points: Vec<(Date, f64)>,
}

impl ReturnSeries {
    /// Builds a return series, sorting by date.
    pub fn new(mut points: Vec<(Date, f64)>) -> Self {
        points.sort_by_key(|(date, _)| *date);
        Self { points }
    }

    /// Keeps only the most recent `n` returns.
    #[must_use]
    pub fn tail(mut self, n: usize) -> Self {
        let skip = self.points.len().saturating_sub(n);
        self.points.drain(..skip);
        self
    }

    /// Number of returns.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series holds no returns.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(date, return)` pairs, oldest first.
    pub fn points(&self) -> &[(Date, f64)] {
        &self.points
    }

    /// Inner join with another return series on date.
    ///
    /// Both series are ascending, so this is a single merge pass.
    pub fn align(&self, other: &Self) -> Vec<(f64, f64)> {
        let mut aligned = Vec::with_capacity(self.len().min(other.len()));
        let (mut i, mut j) = (0, 0);

        while i < self.points.len() && j < other.points.len() {
            let (da, ra) = self.points[i];
            let (db, rb) = other.points[j];
            match da.cmp(&db) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    if ra.is_finite() && rb.is_finite() {
                        aligned.push((ra, rb));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }

        aligned
    }
}
