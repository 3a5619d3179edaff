//! Composite scoring for navpick.
//!
//! This crate maps a [`FeatureSet`](navpick_traits::FeatureSet) to one scalar
//! score with a fixed additive formula: momentum terms are rewarded, risk
//! terms are penalised, and two soft caps penalise only the excess beyond
//! their threshold.
//!
//! # Examples
//!
//! ```rust
//! use navpick_score::{LinearScorer, ScoreWeights};
//! use navpick_traits::{FeatureSet, Scorer};
//!
//! let scorer = LinearScorer::new(ScoreWeights::default());
//! let flat = FeatureSet::default();
//!
//! // only the centred up-day term survives on a flat series
//! assert_eq!(scorer.score(&flat), -0.8 * 0.5);
//! ```

mod linear;
mod weights;

// Re-export main types
pub use linear::LinearScorer;
pub use weights::{ScoreBreakdown, ScoreWeights};
