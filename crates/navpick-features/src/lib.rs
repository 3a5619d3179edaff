//! Windowed technical features for navpick.
//!
//! This crate turns one validated [`PriceSeries`](navpick_traits::PriceSeries)
//! into a [`FeatureSet`](navpick_traits::FeatureSet) as of its last
//! observation, plus the up/down bitstring used by the optional pattern
//! filter.
//!
//! # Example
//!
//! ```ignore
//! use navpick_features::{FeatureConfig, FeatureEngine};
//!
//! let engine = FeatureEngine::new(FeatureConfig::default())?;
//! match engine.compute(&series) {
//!     Ok(features) => println!("ret_hold = {:.4}", features.ret_hold),
//!     Err(short) => println!("skipped: {short}"),
//! }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod engine;
mod pattern;

pub use engine::{FEATURE_WINDOW, FeatureConfig, FeatureEngine, InsufficientHistory};
pub use pattern::updown_pattern;
