//! Market regime filtering and diversified Top-N selection.
//!
//! - [`MarketRegimeFilter`] derives a risk-on/risk-off flag from a broad
//!   market index and its moving average.
//! - [`SelectionEngine`] applies eligibility filters, ranks scored
//!   candidates, and greedily picks a Top-N subset whose pairwise return
//!   correlations stay under a ceiling, backfilling when diversification is
//!   too strict.
//!
//! # Example
//!
//! ```ignore
//! use navpick_select::{MarketFilterMode, SelectionConfig, SelectionEngine};
//!
//! let engine = SelectionEngine::new(SelectionConfig::default())?;
//! let result = engine.select(&scored, &returns_by_id, regime.as_ref(), MarketFilterMode::Warn);
//! for pick in &result.selected {
//!     println!("{} {:.4}", pick.id, pick.score);
//! }
//! ```

mod correlation;
mod regime;
mod selection;

pub use correlation::pair_correlation;
pub use regime::{MarketFilterMode, MarketRegime, MarketRegimeFilter, RegimeConfig};
pub use selection::{
    Ineligibility, Ineligible, RejectReason, Rejection, SelectionConfig, SelectionEngine,
    SelectionResult,
};
