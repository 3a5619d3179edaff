//! Scorer trait for turning a feature record into a ranking score.

use crate::FeatureSet;

/// Maps a [`FeatureSet`] to one scalar composite score.
///
/// Scores are unbounded reals used only for relative ranking. A scorer must
/// be a pure function of the features and its own configuration, which lets
/// candidates be scored in parallel (`Send + Sync`).
///
/// # Example
///
/// ```
/// use navpick_traits::{FeatureSet, Scorer};
///
/// struct MomentumOnly;
///
/// impl Scorer for MomentumOnly {
///     fn name(&self) -> &str {
///         "momentum_only"
///     }
///
///     fn score(&self, features: &FeatureSet) -> f64 {
///         features.ret_hold
///     }
/// }
///
/// let features = FeatureSet { ret_hold: 0.03, ..FeatureSet::default() };
/// assert_eq!(MomentumOnly.score(&features), 0.03);
/// ```
pub trait Scorer: Send + Sync {
    /// Name of this scoring rule, used in logs and reports.
    fn name(&self) -> &str;

    /// Computes the composite score of one feature record.
    fn score(&self, features: &FeatureSet) -> f64;
}
