//! Offline evaluation of navpick scores.
//!
//! [`BacktestHarness`] replays feature extraction and scoring along one
//! historical price series and correlates each score with the return that
//! followed it. The resulting Information Coefficient says whether the
//! scoring formula has any predictive power on that instrument.
//!
//! # Example
//!
//! ```rust,ignore
//! use navpick_eval::BacktestHarness;
//! use navpick_features::FeatureEngine;
//! use navpick_score::LinearScorer;
//!
//! let harness = BacktestHarness::new(FeatureEngine::default(), LinearScorer::default());
//! let report = harness.run(&series);
//! println!("IC = {:?} ({})", report.ic, report.strength());
//! ```

pub mod backtest;
pub mod ic;

pub use backtest::{BacktestHarness, BacktestRecord, BacktestReport, FIRST_EVALUATION_INDEX};
pub use ic::{IcStrength, calculate_ic, rank_ic};
