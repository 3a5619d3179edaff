//! Additive linear scorer.

use navpick_traits::{FeatureSet, Result, Scorer};

use crate::weights::{ScoreBreakdown, ScoreWeights};

/// Scores features with the weighted additive formula
///
/// ```text
/// score = W_RET_HOLD     * ret_hold
///       + W_RET_20       * ret_20
///       - W_VOL_20       * vol_20
///       - W_MDD_20       * |mdd_20|
///       + W_POS_20       * (pos_ratio_20 - 0.5)
///       - W_RET_HOLD_CAP * ret_hold_over_cap
///       - W_BIAS_20      * bias_20_over
/// ```
///
/// No normalisation or clamping is applied. Scores are comparable only
/// under one set of weights.
#[derive(Debug, Clone, Default)]
pub struct LinearScorer {
    weights: ScoreWeights,
}

impl LinearScorer {
    /// Creates a scorer with the given weights.
    pub const fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Creates a scorer after checking the weights are finite.
    ///
    /// # Errors
    ///
    /// Returns an error if [`ScoreWeights::validate`] fails.
    pub fn try_new(weights: ScoreWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self::new(weights))
    }

    /// The weights in use.
    pub const fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Per-term contributions for reporting.
    pub fn breakdown(&self, features: &FeatureSet) -> ScoreBreakdown {
        self.weights.breakdown(features)
    }
}

impl Scorer for LinearScorer {
    fn name(&self) -> &str {
        "linear"
    }

    fn score(&self, features: &FeatureSet) -> f64 {
        self.breakdown(features).total()
    }
}
