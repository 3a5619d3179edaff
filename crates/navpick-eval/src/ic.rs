//! Information Coefficient (IC) calculations.
//!
//! The IC measures how well a score predicts the subsequent realized return.
//! [`calculate_ic`] is the Pearson correlation of the two sequences;
//! [`rank_ic`] is its Spearman counterpart and is less sensitive to outliers.

use std::fmt;

use navpick_traits::stats::{pearson, spearman};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Pearson correlation between scores and forward returns.
///
/// Pairs where either side is non-finite are dropped first. Returns `None`
/// (undefined IC) when the lengths differ, fewer than two pairs remain, or
/// either sequence has zero variance.
///
/// # Example
///
/// ```rust
/// use ndarray::array;
/// use navpick_eval::calculate_ic;
///
/// let scores = array![1.5, 0.3, -0.8, 2.1];
/// let returns = array![0.02, 0.01, -0.01, 0.03];
/// let ic = calculate_ic(&scores, &returns).unwrap();
/// assert!(ic > 0.9);
/// ```
pub fn calculate_ic(scores: &Array1<f64>, forward_returns: &Array1<f64>) -> Option<f64> {
    let (s, r) = finite_pairs(scores, forward_returns)?;
    pearson(&s, &r)
}

/// Spearman rank correlation between scores and forward returns.
///
/// Same filtering and undefined cases as [`calculate_ic`].
pub fn rank_ic(scores: &Array1<f64>, forward_returns: &Array1<f64>) -> Option<f64> {
    let (s, r) = finite_pairs(scores, forward_returns)?;
    spearman(&s, &r)
}

fn finite_pairs(scores: &Array1<f64>, forward_returns: &Array1<f64>) -> Option<(Vec<f64>, Vec<f64>)> {
    if scores.len() != forward_returns.len() {
        return None;
    }

    let (s, r): (Vec<f64>, Vec<f64>) = scores
        .iter()
        .zip(forward_returns.iter())
        .filter(|(s, r)| s.is_finite() && r.is_finite())
        .map(|(&s, &r)| (s, r))
        .unzip();

    (s.len() >= 2).then_some((s, r))
}

/// Informational interpretation band of an IC value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IcStrength {
    /// `ic > 0.10`
    Strong,
    /// `0.02 < ic <= 0.10`
    WeakPositive,
    /// `-0.02 <= ic <= 0.02`
    Negligible,
    /// `ic < -0.02`; the score predicts in the wrong direction.
    Inverse,
    /// No IC could be computed.
    Undefined,
}

impl IcStrength {
    /// Classifies an IC value.
    pub fn classify(ic: Option<f64>) -> Self {
        match ic {
            Some(ic) if ic > 0.10 => Self::Strong,
            Some(ic) if ic > 0.02 => Self::WeakPositive,
            Some(ic) if ic >= -0.02 => Self::Negligible,
            Some(ic) if ic < -0.02 => Self::Inverse,
            _ => Self::Undefined,
        }
    }
}

impl fmt::Display for IcStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Strong => "strong",
            Self::WeakPositive => "weak positive",
            Self::Negligible => "negligible",
            Self::Inverse => "inverse",
            Self::Undefined => "undefined",
        };
        f.write_str(label)
    }
}
