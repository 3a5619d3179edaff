//! Eligibility filtering, ranking, and correlation-constrained Top-N.

use std::collections::HashMap;

use navpick_traits::{NavpickError, PriceSeries, Result, ReturnSeries, ScoredCandidate, Symbol};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::correlation::pair_correlation;
use crate::regime::{MarketFilterMode, MarketRegime};

/// Configuration for candidate selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Maximum number of selected candidates.
    pub top_n: usize,
    /// Highest pairwise return correlation accepted between two picks.
    pub max_pair_corr: f64,
    /// Apply the correlation constraint; when false the first `top_n`
    /// ranked candidates are taken.
    pub diversify_enabled: bool,
    /// Fill remaining slots with rejected candidates in rank order.
    pub backfill_enabled: bool,
    /// Number of most recent daily returns compared per pair.
    pub corr_lookback: usize,
    /// Common observations required before a correlation is trusted.
    pub min_overlap: usize,
    /// Drop candidates whose `ret_hold <= 0`.
    pub positive_momentum_filter_enabled: bool,
    /// Keep only candidates whose pattern starts with `target_pattern`.
    pub pattern_filter_enabled: bool,
    /// Up/down prefix required by the pattern filter, newest day first.
    pub target_pattern: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            top_n: 6,
            max_pair_corr: 0.80,
            diversify_enabled: true,
            backfill_enabled: true,
            corr_lookback: 60,
            min_overlap: 30,
            positive_momentum_filter_enabled: true,
            pattern_filter_enabled: false,
            target_pattern: "101111".to_string(),
        }
    }
}

impl SelectionConfig {
    /// Checks the configuration preconditions.
    ///
    /// # Errors
    ///
    /// Returns [`NavpickError::InvalidParameter`] when `top_n` is zero,
    /// `max_pair_corr` lies outside `(0, 1]`, `min_overlap` is below two,
    /// `corr_lookback` is shorter than `min_overlap`, or the target pattern
    /// contains characters other than `0` and `1`.
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(NavpickError::InvalidParameter(
                "top_n must be at least 1".to_string(),
            ));
        }
        if !(self.max_pair_corr > 0.0 && self.max_pair_corr <= 1.0) {
            return Err(NavpickError::InvalidParameter(format!(
                "max_pair_corr must lie in (0, 1], got {}",
                self.max_pair_corr
            )));
        }
        if self.min_overlap < 2 {
            return Err(NavpickError::InvalidParameter(format!(
                "min_overlap must be at least 2, got {}",
                self.min_overlap
            )));
        }
        if self.corr_lookback < self.min_overlap {
            return Err(NavpickError::InvalidParameter(format!(
                "corr_lookback ({}) must not be shorter than min_overlap ({})",
                self.corr_lookback, self.min_overlap
            )));
        }
        if !self.target_pattern.chars().all(|c| c == '0' || c == '1') {
            return Err(NavpickError::InvalidParameter(format!(
                "target_pattern must contain only 0 and 1, got '{}'",
                self.target_pattern
            )));
        }
        Ok(())
    }
}

/// Why a candidate failed the eligibility filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ineligibility {
    /// `ret_hold` was zero or negative.
    NonPositiveMomentum,
    /// The up/down pattern was missing or did not start with the target.
    PatternMismatch,
}

/// A candidate dropped before ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ineligible {
    /// The dropped candidate.
    pub candidate: ScoredCandidate,
    /// Filter that dropped it.
    pub reason: Ineligibility,
}

/// Why a ranked candidate was passed over by diversification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Too correlated with an already selected candidate.
    HighCorrelation {
        /// The selected candidate it correlated with most.
        with: Symbol,
    },
}

/// A ranked candidate not selected because of the correlation ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    /// The rejected candidate.
    pub candidate: ScoredCandidate,
    /// Reason for rejection.
    pub reason: RejectReason,
    /// Maximum correlation against the selection at the time of rejection.
    pub max_corr: f64,
}

/// Outcome of one selection run.
///
/// `selected` and `rejected` are disjoint. Candidates backfilled into
/// `selected` are removed from `rejected` and sit at the end of `selected`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    /// Picks in order: diversified picks by rank, then backfilled picks by rank.
    pub selected: Vec<ScoredCandidate>,
    /// Candidates rejected by diversification and not backfilled, by rank.
    pub rejected: Vec<Rejection>,
    /// Candidates removed by the eligibility filters, in pool order.
    pub ineligible: Vec<Ineligible>,
    /// How many trailing entries of `selected` were backfilled.
    pub backfilled: usize,
    /// True when a blocking risk-off regime stopped selection.
    pub halted: bool,
}

impl SelectionResult {
    /// The empty result produced by a blocking risk-off regime.
    pub fn halted() -> Self {
        Self {
            halted: true,
            ..Self::default()
        }
    }

    /// Picks that passed the correlation constraint.
    pub fn diversified(&self) -> &[ScoredCandidate] {
        &self.selected[..self.selected.len() - self.backfilled]
    }
}

/// Selects a bounded, diversified subset of scored candidates.
#[derive(Debug, Clone)]
pub struct SelectionEngine {
    config: SelectionConfig,
}

impl SelectionEngine {
    /// Creates an engine after validating its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if [`SelectionConfig::validate`] fails, e.g. for
    /// `top_n == 0`.
    pub fn new(config: SelectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The engine configuration.
    pub const fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// The return window compared during diversification: the most recent
    /// `corr_lookback` daily returns of `series`.
    pub fn return_window(&self, series: &PriceSeries) -> ReturnSeries {
        series.daily_returns().tail(self.config.corr_lookback)
    }

    /// Runs selection over `candidates`, given in candidate-pool order.
    ///
    /// Steps:
    /// 1. a blocking risk-off regime returns [`SelectionResult::halted`]
    /// 2. eligibility filters (positive momentum, pattern prefix)
    /// 3. stable descending sort by score, so earlier pool entries win ties
    /// 4. greedy acceptance while the maximum pairwise correlation with the
    ///    current selection is at most `max_pair_corr`
    /// 5. backfill from the rejected candidates up to `top_n`
    ///
    /// `returns` maps candidate ids to their return windows, see
    /// [`SelectionEngine::return_window`]. A missing entry makes every pair
    /// involving that candidate count as fully correlated.
    pub fn select(
        &self,
        candidates: &[ScoredCandidate],
        returns: &HashMap<Symbol, ReturnSeries>,
        regime: Option<&MarketRegime>,
        mode: MarketFilterMode,
    ) -> SelectionResult {
        if mode == MarketFilterMode::Block && regime.is_some_and(|r| !r.risk_on) {
            info!("market regime is risk-off in block mode, selection halted");
            return SelectionResult::halted();
        }

        let mut eligible: Vec<&ScoredCandidate> = Vec::with_capacity(candidates.len());
        let mut ineligible = Vec::new();
        for candidate in candidates {
            match self.ineligibility(candidate) {
                Some(reason) => {
                    debug!(id = %candidate.id, ?reason, "candidate ineligible");
                    ineligible.push(Ineligible {
                        candidate: candidate.clone(),
                        reason,
                    });
                }
                None => eligible.push(candidate),
            }
        }

        eligible.sort_by(|a, b| rank_key(b).total_cmp(&rank_key(a)));

        let top_n = self.config.top_n;
        let mut result = SelectionResult {
            ineligible,
            ..SelectionResult::default()
        };

        if !self.config.diversify_enabled {
            result.selected = eligible.into_iter().take(top_n).cloned().collect();
            return result;
        }

        for candidate in eligible {
            if result.selected.len() >= top_n {
                break;
            }

            let worst = result
                .selected
                .iter()
                .map(|picked| {
                    let corr = pair_correlation(
                        returns.get(&candidate.id),
                        returns.get(&picked.id),
                        self.config.min_overlap,
                    );
                    (corr, picked.id.clone())
                })
                .max_by(|a, b| a.0.total_cmp(&b.0));

            match worst {
                Some((max_corr, with)) if max_corr > self.config.max_pair_corr => {
                    debug!(id = %candidate.id, %with, max_corr, "rejected as too correlated");
                    result.rejected.push(Rejection {
                        candidate: candidate.clone(),
                        reason: RejectReason::HighCorrelation { with },
                        max_corr,
                    });
                }
                _ => result.selected.push(candidate.clone()),
            }
        }

        if self.config.backfill_enabled && result.selected.len() < top_n {
            let needed = (top_n - result.selected.len()).min(result.rejected.len());
            result.backfilled = needed;
            result
                .selected
                .extend(result.rejected.drain(..needed).map(|r| r.candidate));
        }

        info!(
            selected = result.selected.len(),
            rejected = result.rejected.len(),
            ineligible = result.ineligible.len(),
            backfilled = result.backfilled,
            "selection complete"
        );

        result
    }

    fn ineligibility(&self, candidate: &ScoredCandidate) -> Option<Ineligibility> {
        if self.config.positive_momentum_filter_enabled && candidate.features.ret_hold <= 0.0 {
            return Some(Ineligibility::NonPositiveMomentum);
        }
        if self.config.pattern_filter_enabled {
            let matches = candidate
                .pattern
                .as_deref()
                .is_some_and(|p| p.starts_with(&self.config.target_pattern));
            if !matches {
                return Some(Ineligibility::PatternMismatch);
            }
        }
        None
    }
}

/// Non-finite scores rank last.
fn rank_key(candidate: &ScoredCandidate) -> f64 {
    if candidate.score.is_finite() {
        candidate.score
    } else {
        f64::NEG_INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use navpick_traits::{Date, FeatureSet};

    fn candidate(id: &str, score: f64, ret_hold: f64) -> ScoredCandidate {
        ScoredCandidate {
            id: id.to_string(),
            name: format!("Fund {id}"),
            features: FeatureSet {
                ret_hold,
                ..Default::default()
            },
            pattern: Some("1011110000000000000".to_string()),
            score,
        }
    }

    fn returns(phase: f64) -> ReturnSeries {
        let start = Date::from_ymd_opt(2024, 1, 1).unwrap();
        ReturnSeries::new(
            (0..60)
                .map(|i| {
                    let r = ((i as f64) * 0.9 + phase).sin() * 0.01;
                    (start + chrono::Days::new(i), r)
                })
                .collect(),
        )
    }

    fn engine(config: SelectionConfig) -> SelectionEngine {
        SelectionEngine::new(config).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = SelectionConfig::default();
        assert_eq!(config.top_n, 6);
        assert_relative_eq!(config.max_pair_corr, 0.80);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs_fail_fast() {
        let bad = [
            SelectionConfig {
                top_n: 0,
                ..Default::default()
            },
            SelectionConfig {
                max_pair_corr: 0.0,
                ..Default::default()
            },
            SelectionConfig {
                max_pair_corr: 1.5,
                ..Default::default()
            },
            SelectionConfig {
                max_pair_corr: f64::NAN,
                ..Default::default()
            },
            SelectionConfig {
                corr_lookback: 10,
                ..Default::default()
            },
            SelectionConfig {
                target_pattern: "10x".to_string(),
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(matches!(
                SelectionEngine::new(config),
                Err(NavpickError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_block_mode_halts_on_risk_off() {
        let regime = MarketRegime {
            index_id: "IDX".to_string(),
            last_close: 9.0,
            ma_window_mean: 10.0,
            bias: -0.1,
            risk_on: false,
        };
        let engine = engine(SelectionConfig::default());
        let pool = vec![candidate("A", 1.0, 0.05)];

        let halted = engine.select(&pool, &HashMap::new(), Some(&regime), MarketFilterMode::Block);
        assert!(halted.halted);
        assert!(halted.selected.is_empty());
        assert!(halted.ineligible.is_empty());

        let warned = engine.select(&pool, &HashMap::new(), Some(&regime), MarketFilterMode::Warn);
        assert!(!warned.halted);
        assert_eq!(warned.selected.len(), 1);
    }

    #[test]
    fn test_positive_momentum_filter() {
        let pool = vec![
            candidate("A", 3.0, 0.0),
            candidate("B", 2.0, -0.01),
            candidate("C", 1.0, 0.02),
        ];
        let result = engine(SelectionConfig::default()).select(
            &pool,
            &HashMap::new(),
            None,
            MarketFilterMode::Warn,
        );
        assert_eq!(result.selected.len(), 1);
        assert_eq!(result.selected[0].id, "C");
        assert_eq!(result.ineligible.len(), 2);
        assert!(
            result
                .ineligible
                .iter()
                .all(|i| i.reason == Ineligibility::NonPositiveMomentum)
        );

        let unfiltered = engine(SelectionConfig {
            positive_momentum_filter_enabled: false,
            ..Default::default()
        })
        .select(&pool, &HashMap::new(), None, MarketFilterMode::Warn);
        assert!(unfiltered.ineligible.is_empty());
        assert_eq!(unfiltered.selected[0].id, "A");
    }

    #[test]
    fn test_pattern_filter() {
        let mut other = candidate("B", 2.0, 0.01);
        other.pattern = Some("0111111111111111111".to_string());
        let mut missing = candidate("C", 3.0, 0.01);
        missing.pattern = None;
        let pool = vec![candidate("A", 1.0, 0.01), other, missing];

        let result = engine(SelectionConfig {
            pattern_filter_enabled: true,
            diversify_enabled: false,
            ..Default::default()
        })
        .select(&pool, &HashMap::new(), None, MarketFilterMode::Warn);

        assert_eq!(result.selected.len(), 1);
        assert_eq!(result.selected[0].id, "A");
        assert_eq!(result.ineligible.len(), 2);
        assert!(
            result
                .ineligible
                .iter()
                .all(|i| i.reason == Ineligibility::PatternMismatch)
        );
    }

    #[test]
    fn test_ranking_is_stable_on_ties() {
        let pool = vec![
            candidate("first", 1.0, 0.01),
            candidate("top", 2.0, 0.01),
            candidate("second", 1.0, 0.01),
        ];
        let result = engine(SelectionConfig {
            diversify_enabled: false,
            ..Default::default()
        })
        .select(&pool, &HashMap::new(), None, MarketFilterMode::Warn);

        let ids: Vec<&str> = result.selected.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["top", "first", "second"]);
    }

    #[test]
    fn test_diversification_disabled_takes_top_n() {
        let pool: Vec<ScoredCandidate> = (0..10)
            .map(|i| candidate(&format!("F{i}"), i as f64, 0.01))
            .collect();
        let result = engine(SelectionConfig {
            top_n: 3,
            diversify_enabled: false,
            ..Default::default()
        })
        .select(&pool, &HashMap::new(), None, MarketFilterMode::Warn);

        let ids: Vec<&str> = result.selected.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["F9", "F8", "F7"]);
        assert!(result.rejected.is_empty());
    }

    #[test]
    fn test_identical_returns_rejected() {
        let pool = vec![
            candidate("A", 3.0, 0.01),
            candidate("A2", 2.5, 0.01),
            candidate("B", 2.0, 0.01),
        ];
        let mut map = HashMap::new();
        map.insert("A".to_string(), returns(0.0));
        map.insert("A2".to_string(), returns(0.0));
        map.insert("B".to_string(), returns(1.6));

        let result = engine(SelectionConfig {
            top_n: 2,
            ..Default::default()
        })
        .select(&pool, &map, None, MarketFilterMode::Warn);

        let ids: Vec<&str> = result.selected.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(result.backfilled, 0);
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].candidate.id, "A2");
        assert_relative_eq!(result.rejected[0].max_corr, 1.0, epsilon = 1e-9);
        assert_eq!(
            result.rejected[0].reason,
            RejectReason::HighCorrelation {
                with: "A".to_string()
            }
        );
    }

    #[test]
    fn test_backfill_fills_to_top_n() {
        let pool = vec![
            candidate("A", 3.0, 0.01),
            candidate("A2", 2.5, 0.01),
            candidate("A3", 2.0, 0.01),
        ];
        let map: HashMap<Symbol, ReturnSeries> = ["A", "A2", "A3"]
            .into_iter()
            .map(|id| (id.to_string(), returns(0.0)))
            .collect();

        let result = engine(SelectionConfig {
            top_n: 2,
            ..Default::default()
        })
        .select(&pool, &map, None, MarketFilterMode::Warn);

        let ids: Vec<&str> = result.selected.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "A2"]);
        assert_eq!(result.backfilled, 1);
        assert_eq!(result.diversified().len(), 1);
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].candidate.id, "A3");
    }

    #[test]
    fn test_backfill_disabled_keeps_strict_result() {
        let pool = vec![candidate("A", 3.0, 0.01), candidate("B", 2.0, 0.01)];
        // no return series at all: every pair counts as fully correlated
        let result = engine(SelectionConfig {
            backfill_enabled: false,
            ..Default::default()
        })
        .select(&pool, &HashMap::new(), None, MarketFilterMode::Warn);

        assert_eq!(result.selected.len(), 1);
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.backfilled, 0);
    }

    #[test]
    fn test_non_finite_score_ranks_last() {
        let pool = vec![candidate("nan", f64::NAN, 0.01), candidate("ok", -5.0, 0.01)];
        let result = engine(SelectionConfig {
            diversify_enabled: false,
            ..Default::default()
        })
        .select(&pool, &HashMap::new(), None, MarketFilterMode::Warn);
        assert_eq!(result.selected[0].id, "ok");
    }
}
