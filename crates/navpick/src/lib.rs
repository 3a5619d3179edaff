#![doc(issue_tracker_base_url = "https://github.com/navpick/navpick/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![forbid(unsafe_code)]

//! # navpick
//!
//! Short-horizon momentum ranking and diversified selection of funds and ETFs.
//!
//! navpick is an umbrella crate that re-exports the navpick sub-crates and
//! adds the [`Pipeline`] that runs them end to end.
//!
//! ## Quick Start
//!
//! ```ignore
//! use navpick::{Candidate, NavpickConfig, Pipeline};
//!
//! let pipeline = Pipeline::new(NavpickConfig::default())?;
//! let report = pipeline.run(&pool, market.as_ref());
//! println!("{report}");
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Shared types, errors, statistics and the [`Scorer`] trait
//! - [`features`] - Windowed features and the up/down pattern
//! - [`score`] - The weighted linear composite score
//! - [`select`] - Market regime filter and diversified Top-N selection
//! - [`eval`] - Backtest harness and Information Coefficient
//!
//! ## Data Flow
//!
//! 1. **Features** are computed per candidate from its own price series
//! 2. **Scores** map features to one ranking scalar
//! 3. **Selection** filters, ranks and diversifies the scored candidates
//! 4. **Backtests** replay features and scores to measure predictive power

/// Version information for the navpick crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod config;
mod pipeline;
mod report;

pub use config::NavpickConfig;
pub use pipeline::Pipeline;
pub use report::{RunReport, Skipped};

/// Shared types, errors and statistics.
pub mod traits {
    pub use navpick_traits::*;
}

pub use navpick_traits::{
    Candidate, Date, FeatureSet, MarketData, NavpickError, PricePoint, PriceSeries, Result,
    ReturnSeries, ScoredCandidate, Scorer, Symbol,
};

/// Feature extraction.
///
/// See [`FeatureEngine`](features::FeatureEngine) for the feature formulas.
pub mod features {
    pub use navpick_features::*;
}

/// Composite scoring.
pub mod score {
    pub use navpick_score::*;
}

/// Regime filtering and diversified selection.
pub mod select {
    pub use navpick_select::*;
}

/// Backtesting and IC evaluation.
pub mod eval {
    pub use navpick_eval::*;
}
