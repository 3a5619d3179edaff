//! Score weights and the per-term breakdown.

use navpick_traits::{FeatureSet, NavpickError, Result};
use serde::{Deserialize, Serialize};

/// Coefficients of the composite score.
///
/// All weights are magnitudes; the sign of each term is fixed by the
/// formula, so a positive `vol_20` weight penalises volatility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Reward for `ret_hold`.
    pub ret_hold: f64,
    /// Reward for `ret_20`.
    pub ret_20: f64,
    /// Penalty on `vol_20`.
    pub vol_20: f64,
    /// Penalty on `|mdd_20|`.
    pub mdd_20: f64,
    /// Reward for `pos_ratio_20 - 0.5`.
    pub pos_20: f64,
    /// Penalty on `ret_hold_over_cap`.
    pub ret_hold_cap: f64,
    /// Penalty on `bias_20_over`.
    pub bias_20: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            ret_hold: 6.0,
            ret_20: 2.0,
            vol_20: 2.5,
            mdd_20: 4.0,
            pos_20: 0.8,
            ret_hold_cap: 8.0,
            bias_20: 5.0,
        }
    }
}

impl ScoreWeights {
    /// Checks that every weight is finite.
    ///
    /// # Errors
    ///
    /// Returns [`NavpickError::InvalidParameter`] naming the first
    /// non-finite weight.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("ret_hold", self.ret_hold),
            ("ret_20", self.ret_20),
            ("vol_20", self.vol_20),
            ("mdd_20", self.mdd_20),
            ("pos_20", self.pos_20),
            ("ret_hold_cap", self.ret_hold_cap),
            ("bias_20", self.bias_20),
        ];
        match named.iter().find(|(_, w)| !w.is_finite()) {
            Some((name, w)) => Err(NavpickError::InvalidParameter(format!(
                "score weight {name} must be finite, got {w}"
            ))),
            None => Ok(()),
        }
    }

    /// Splits the score of `features` into its signed terms.
    pub fn breakdown(&self, features: &FeatureSet) -> ScoreBreakdown {
        ScoreBreakdown {
            ret_hold: self.ret_hold * features.ret_hold,
            ret_20: self.ret_20 * features.ret_20,
            vol_20: -(self.vol_20 * features.vol_20),
            mdd_20: -(self.mdd_20 * features.mdd_20.abs()),
            pos_20: self.pos_20 * (features.pos_ratio_20 - 0.5),
            ret_hold_cap: -(self.ret_hold_cap * features.ret_hold_over_cap),
            bias_20: -(self.bias_20 * features.bias_20_over),
        }
    }
}

/// Signed contribution of each term to the composite score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Short-horizon momentum reward.
    pub ret_hold: f64,
    /// 20-day trend reward.
    pub ret_20: f64,
    /// Volatility penalty (non-positive for non-negative weights).
    pub vol_20: f64,
    /// Drawdown penalty.
    pub mdd_20: f64,
    /// Up-day ratio term, centred at a coin flip.
    pub pos_20: f64,
    /// Soft-cap penalty on overextended momentum.
    pub ret_hold_cap: f64,
    /// Penalty on overheated deviation from the 20-day mean.
    pub bias_20: f64,
}

impl ScoreBreakdown {
    /// Sum of all terms, accumulated in formula order.
    pub fn total(&self) -> f64 {
        self.ret_hold
            + self.ret_20
            + self.vol_20
            + self.mdd_20
            + self.pos_20
            + self.ret_hold_cap
            + self.bias_20
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_weights() {
        let w = ScoreWeights::default();
        assert_eq!(w.ret_hold, 6.0);
        assert_eq!(w.ret_hold_cap, 8.0);
        assert!(w.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let w = ScoreWeights {
            vol_20: f64::NAN,
            ..Default::default()
        };
        let err = w.validate().unwrap_err();
        assert!(err.to_string().contains("vol_20"));
    }

    #[test]
    fn test_breakdown_signs() {
        let features = FeatureSet {
            ret_hold: 0.05,
            ret_20: 0.08,
            vol_20: 0.01,
            mdd_20: -0.03,
            pos_ratio_20: 0.6,
            ret_hold_over_cap: 0.0,
            bias_20_over: 0.02,
            ..Default::default()
        };
        let b = ScoreWeights::default().breakdown(&features);

        assert_relative_eq!(b.ret_hold, 0.30, epsilon = 1e-12);
        assert_relative_eq!(b.ret_20, 0.16, epsilon = 1e-12);
        assert_relative_eq!(b.vol_20, -0.025, epsilon = 1e-12);
        assert_relative_eq!(b.mdd_20, -0.12, epsilon = 1e-12);
        assert_relative_eq!(b.pos_20, 0.08, epsilon = 1e-12);
        assert_eq!(b.ret_hold_cap, 0.0);
        assert_relative_eq!(b.bias_20, -0.10, epsilon = 1e-12);
        assert_relative_eq!(b.total(), 0.30 + 0.16 - 0.025 - 0.12 + 0.08 - 0.10, epsilon = 1e-12);
    }
}
