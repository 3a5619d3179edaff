//! Feature extraction from a single price series.

use navpick_traits::stats::{mean, sample_std};
use navpick_traits::{FeatureSet, NavpickError, PriceSeries, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Length of the trailing window behind every `*_20` feature.
pub const FEATURE_WINDOW: usize = 20;

/// Configuration for feature extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Holding horizon in trading days; drives `ret_hold`.
    pub hold_days: usize,
    /// `ret_hold` above this level counts towards `ret_hold_over_cap`.
    pub ret_hold_soft_cap: f64,
    /// `bias_20` above this level counts towards `bias_20_over`.
    pub bias_threshold: f64,
    /// When false, `bias_20_over` is always zero.
    pub bias_penalty_enabled: bool,
    /// Number of prices encoded by the up/down pattern.
    pub pattern_points: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            hold_days: 7,
            ret_hold_soft_cap: 0.12,
            bias_threshold: 0.10,
            bias_penalty_enabled: true,
            pattern_points: 20,
        }
    }
}

impl FeatureConfig {
    /// Checks the configuration preconditions.
    ///
    /// # Errors
    ///
    /// Returns [`NavpickError::InvalidParameter`] when `hold_days` is zero,
    /// `pattern_points` is below two, or a threshold is not finite.
    pub fn validate(&self) -> Result<()> {
        if self.hold_days == 0 {
            return Err(NavpickError::InvalidParameter(
                "hold_days must be at least 1".to_string(),
            ));
        }
        if self.pattern_points < 2 {
            return Err(NavpickError::InvalidParameter(format!(
                "pattern_points must be at least 2, got {}",
                self.pattern_points
            )));
        }
        if !self.ret_hold_soft_cap.is_finite() || !self.bias_threshold.is_finite() {
            return Err(NavpickError::InvalidParameter(
                "ret_hold_soft_cap and bias_threshold must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Minimum series length before any feature can be computed.
    pub fn min_history(&self) -> usize {
        (self.hold_days + 1).max(FEATURE_WINDOW + 1)
    }
}

/// The series is too short for feature extraction.
///
/// This is an expected outcome for young funds and thin data, not a fault:
/// the candidate is simply left out of scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("insufficient history: {available} observations, {required} required")]
pub struct InsufficientHistory {
    /// Observations needed.
    pub required: usize,
    /// Observations present.
    pub available: usize,
}

/// Computes [`FeatureSet`] records as of the last observation of a series.
///
/// Extraction is pure: the same series and configuration always give the
/// same features, and the input is never modified.
#[derive(Debug, Clone, Default)]
pub struct FeatureEngine {
    config: FeatureConfig,
}

impl FeatureEngine {
    /// Creates an engine after validating its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if [`FeatureConfig::validate`] fails.
    pub fn new(config: FeatureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The engine configuration.
    pub const fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Minimum series length accepted by [`FeatureEngine::compute`].
    pub fn min_history(&self) -> usize {
        self.config.min_history()
    }

    /// Computes features for a series as of its latest observation.
    ///
    /// # Errors
    ///
    /// Returns [`InsufficientHistory`] when the series is shorter than
    /// [`FeatureEngine::min_history`].
    pub fn compute(&self, series: &PriceSeries) -> std::result::Result<FeatureSet, InsufficientHistory> {
        self.compute_prices(&series.values()).inspect_err(|short| {
            debug!(
                id = series.id(),
                required = short.required,
                available = short.available,
                "skipping series with insufficient history"
            );
        })
    }

    /// Computes features from raw prices, oldest first.
    ///
    /// Used directly by the backtest to evaluate growing prefixes of one
    /// series without copying it.
    ///
    /// # Errors
    ///
    /// Returns [`InsufficientHistory`] when fewer than
    /// [`FeatureEngine::min_history`] prices are given.
    pub fn compute_prices(&self, nav: &[f64]) -> std::result::Result<FeatureSet, InsufficientHistory> {
        let required = self.min_history();
        let n = nav.len();
        if n < required {
            return Err(InsufficientHistory {
                required,
                available: n,
            });
        }

        let last = nav[n - 1];
        let ret_hold = last / nav[n - 1 - self.config.hold_days] - 1.0;
        let ret_20 = if n > FEATURE_WINDOW {
            last / nav[n - 1 - FEATURE_WINDOW] - 1.0
        } else {
            0.0
        };

        let daily_ret: Vec<f64> = nav
            .windows(2)
            .map(|w| w[1] / w[0] - 1.0)
            .filter(|r| r.is_finite())
            .collect();
        let recent_ret = &daily_ret[daily_ret.len().saturating_sub(FEATURE_WINDOW)..];

        let vol_20 = sample_std(recent_ret).unwrap_or(0.0);
        let pos_ratio_20 = if recent_ret.is_empty() {
            0.0
        } else {
            recent_ret.iter().filter(|r| **r > 0.0).count() as f64 / recent_ret.len() as f64
        };

        let window = &nav[n.saturating_sub(FEATURE_WINDOW)..];
        let mdd_20 = max_drawdown(window);
        let ma_20 = mean(window).unwrap_or(0.0);
        let bias_20 = if ma_20 != 0.0 {
            (last - ma_20) / ma_20
        } else {
            0.0
        };

        let bias_20_over = if self.config.bias_penalty_enabled {
            (bias_20 - self.config.bias_threshold).max(0.0)
        } else {
            0.0
        };
        let ret_hold_over_cap = (ret_hold - self.config.ret_hold_soft_cap).max(0.0);

        Ok(FeatureSet {
            ret_hold,
            ret_20,
            vol_20,
            mdd_20,
            pos_ratio_20,
            ma_20,
            bias_20,
            bias_20_over,
            ret_hold_over_cap,
        })
    }

    /// Up/down bitstring of the series tail, newest first.
    pub fn pattern(&self, series: &PriceSeries) -> Option<String> {
        crate::updown_pattern(&series.values(), self.config.pattern_points)
    }
}

/// Worst decline from the running peak inside `window`, as a fraction `<= 0`.
fn max_drawdown(window: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;

    for &price in window {
        peak = peak.max(price);
        worst = worst.min(price / peak - 1.0);
    }

    worst
}
