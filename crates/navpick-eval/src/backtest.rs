//! Historical replay of feature extraction and scoring over one series.

use navpick_features::FeatureEngine;
use navpick_traits::stats::quantile;
use navpick_traits::{Date, PriceSeries, Scorer};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ic::{IcStrength, calculate_ic, rank_ic};

/// First index scored during a replay; the engine looks backward from it.
pub const FIRST_EVALUATION_INDEX: usize = 21;

/// One evaluation date of a backtest run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestRecord {
    /// Evaluation date.
    pub date: Date,
    /// Score computed from prices up to and including `date`.
    pub score: f64,
    /// `nav[i + hold_days] / nav[i] - 1`.
    pub forward_return: f64,
}

/// Output of [`BacktestHarness::run`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Series identifier.
    pub id: String,
    /// Forward-return horizon in observations.
    pub hold_days: usize,
    /// Retained evaluation dates in chronological order.
    pub records: Vec<BacktestRecord>,
    /// Pearson IC between scores and forward returns.
    pub ic: Option<f64>,
    /// Spearman IC between scores and forward returns.
    pub rank_ic: Option<f64>,
}

impl BacktestReport {
    /// Interpretation band of the Pearson IC.
    pub fn strength(&self) -> IcStrength {
        IcStrength::classify(self.ic)
    }

    /// Record scores in chronological order.
    pub fn scores(&self) -> Array1<f64> {
        self.records.iter().map(|r| r.score).collect()
    }

    /// Record forward returns in chronological order.
    pub fn forward_returns(&self) -> Array1<f64> {
        self.records.iter().map(|r| r.forward_return).collect()
    }

    /// Dates whose score lies strictly above the `q`-quantile of all scores.
    ///
    /// `high_score_dates(0.9)` marks the top 10% of scores.
    pub fn high_score_dates(&self, q: f64) -> Vec<Date> {
        let scores: Vec<f64> = self.records.iter().map(|r| r.score).collect();
        quantile(&scores, q).map_or_else(Vec::new, |cut| {
            self.records
                .iter()
                .filter(|r| r.score > cut)
                .map(|r| r.date)
                .collect()
        })
    }

    /// Dates whose score lies strictly below the `1 - q`-quantile of all scores.
    pub fn low_score_dates(&self, q: f64) -> Vec<Date> {
        let scores: Vec<f64> = self.records.iter().map(|r| r.score).collect();
        quantile(&scores, 1.0 - q).map_or_else(Vec::new, |cut| {
            self.records
                .iter()
                .filter(|r| r.score < cut)
                .map(|r| r.date)
                .collect()
        })
    }
}

/// Replays a [`FeatureEngine`] and a [`Scorer`] across one price series.
///
/// Each evaluation index only sees prices up to itself, so no future data
/// leaks into a score. The forward-return horizon is the feature engine's
/// `hold_days`.
#[derive(Debug, Clone)]
pub struct BacktestHarness<S> {
    engine: FeatureEngine,
    scorer: S,
}

impl<S: Scorer> BacktestHarness<S> {
    /// Creates a harness from a feature engine and a scorer.
    pub const fn new(engine: FeatureEngine, scorer: S) -> Self {
        Self { engine, scorer }
    }

    /// The feature engine in use.
    pub const fn engine(&self) -> &FeatureEngine {
        &self.engine
    }

    /// The scorer in use.
    pub const fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Runs the backtest.
    ///
    /// Indices without enough trailing history for features, or without
    /// `hold_days` of leading history for the forward return, are skipped.
    /// The IC is `None` when fewer than two records remain or either
    /// sequence is constant.
    pub fn run(&self, series: &PriceSeries) -> BacktestReport {
        let hold_days = self.engine.config().hold_days;
        let nav = series.values();
        let points = series.points();

        let records: Vec<BacktestRecord> = (FIRST_EVALUATION_INDEX..nav.len())
            .filter(|&i| i + hold_days < nav.len())
            .filter_map(|i| {
                let features = self.engine.compute_prices(&nav[..=i]).ok()?;
                let score = self.scorer.score(&features);
                let forward_return = nav[i + hold_days] / nav[i] - 1.0;
                (score.is_finite() && forward_return.is_finite()).then(|| BacktestRecord {
                    date: points[i].date,
                    score,
                    forward_return,
                })
            })
            .collect();

        debug!(id = series.id(), len = nav.len(), retained = records.len(), "backtest replay done");

        let mut report = BacktestReport {
            id: series.id().to_string(),
            hold_days,
            records,
            ic: None,
            rank_ic: None,
        };
        let scores = report.scores();
        let forward = report.forward_returns();
        report.ic = calculate_ic(&scores, &forward);
        report.rank_ic = rank_ic(&scores, &forward);

        info!(
            id = series.id(),
            scorer = self.scorer.name(),
            records = report.records.len(),
            ic = ?report.ic,
            strength = %report.strength(),
            "backtest complete"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use navpick_features::FeatureConfig;
    use navpick_score::LinearScorer;
    use navpick_traits::FeatureSet;

    fn series(values: &[f64]) -> PriceSeries {
        let start = Date::from_ymd_opt(2023, 1, 2).unwrap();
        PriceSeries::from_pairs(
            "BT",
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (start + chrono::Days::new(i as u64), *v)),
        )
    }

    fn harness() -> BacktestHarness<LinearScorer> {
        BacktestHarness::new(FeatureEngine::default(), LinearScorer::default())
    }

    /// Scores by the trailing hold return only.
    #[derive(Debug)]
    struct MomentumOnly;

    impl Scorer for MomentumOnly {
        fn name(&self) -> &str {
            "momentum"
        }

        fn score(&self, features: &FeatureSet) -> f64 {
            features.ret_hold
        }
    }

    #[test]
    fn test_record_count_and_dates() {
        let values: Vec<f64> = (0..40).map(|i| 1.0 + (i as f64 * 0.7).sin() * 0.1).collect();
        let s = series(&values);
        let report = harness().run(&s);

        // indices 21..=32 have a forward price 7 observations ahead
        assert_eq!(report.records.len(), 12);
        assert_eq!(report.records[0].date, s.points()[21].date);
        assert_eq!(report.records[11].date, s.points()[32].date);
        assert_eq!(report.hold_days, 7);
        assert_relative_eq!(
            report.records[0].forward_return,
            values[28] / values[21] - 1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_scores_use_no_future_data() {
        let values: Vec<f64> = (0..40).map(|i| 1.0 + (i as f64 * 0.3).cos() * 0.2).collect();
        let full = harness().run(&series(&values));
        let truncated = harness().run(&series(&values[..30]));

        // shared indices score identically regardless of what follows them
        for (a, b) in truncated.records.iter().zip(&full.records) {
            assert_eq!(a.date, b.date);
            assert_relative_eq!(a.score, b.score, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_short_series_yields_undefined_ic() {
        let report = harness().run(&series(&[1.0; 25]));
        assert!(report.records.is_empty());
        assert_eq!(report.ic, None);
        assert_eq!(report.strength(), IcStrength::Undefined);
    }

    #[test]
    fn test_constant_series_has_zero_variance() {
        let report = harness().run(&series(&[2.0; 60]));
        assert!(!report.records.is_empty());
        assert_eq!(report.ic, None);
        assert_eq!(report.rank_ic, None);
    }

    #[test]
    fn test_momentum_scorer_on_oscillating_series() {
        // hold return and forward return over a 14-day cycle with hold 7 are
        // in exact opposition, so momentum predicts the wrong way
        let values: Vec<f64> = (0..120)
            .map(|i| 1.0 + (i as f64 * std::f64::consts::PI / 7.0).sin() * 0.05)
            .collect();
        let engine = FeatureEngine::new(FeatureConfig::default()).unwrap();
        let report = BacktestHarness::new(engine, MomentumOnly).run(&series(&values));

        let ic = report.ic.unwrap();
        assert!(ic < -0.9, "ic = {ic}");
        assert_eq!(report.strength(), IcStrength::Inverse);
    }

    #[test]
    fn test_score_quantile_dates() {
        let start = Date::from_ymd_opt(2024, 1, 1).unwrap();
        let report = BacktestReport {
            records: (0..10)
                .map(|i| BacktestRecord {
                    date: start + chrono::Days::new(i),
                    score: i as f64,
                    forward_return: 0.0,
                })
                .collect(),
            ..Default::default()
        };

        // 0.9-quantile of 0..=9 is 8.1
        assert_eq!(report.high_score_dates(0.9), vec![start + chrono::Days::new(9)]);
        // 0.1-quantile is 0.9
        assert_eq!(report.low_score_dates(0.9), vec![start]);
        assert!(BacktestReport::default().high_score_dates(0.9).is_empty());
    }
}
