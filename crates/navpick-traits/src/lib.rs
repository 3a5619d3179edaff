#![doc(issue_tracker_base_url = "https://github.com/navpick/navpick/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types for the navpick fund ranking engine.
//!
//! This crate holds the data model shared by every navpick crate: validated
//! price series, derived return series, feature records, scored candidates,
//! the [`Scorer`] abstraction, the error type, and the small statistics
//! toolkit (sample deviation, Pearson and rank correlation, quantiles).

/// The version of the navpick-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Days between 0001-01-01 (chrono's CE day 1) and the Unix epoch.
///
/// Polars stores `Date` values as days since the Unix epoch.
pub const CE_TO_UNIX_EPOCH_DAYS: i32 = 719_163;

pub mod error;
pub mod scorer;
pub mod series;
pub mod stats;
pub mod types;

pub use error::{NavpickError, Result};
pub use scorer::Scorer;
pub use series::{PriceSeries, ReturnSeries};
pub use types::{Candidate, Date, FeatureSet, MarketData, PricePoint, ScoredCandidate, Symbol};
