//! Property tests for feature extraction.
//!
//! Uses proptest to verify:
//! 1. Short series are rejected, never partially computed
//! 2. `mdd_20` is never positive, and zero exactly for non-decreasing windows
//! 3. Ratios stay inside their natural bounds

use navpick_features::{FEATURE_WINDOW, FeatureConfig, FeatureEngine};
use navpick_traits::{Date, PriceSeries};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (0.5..5.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_prices(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_price(), len)
}

fn to_series(values: &[f64]) -> PriceSeries {
    let start = Date::from_ymd_opt(2023, 1, 2).unwrap();
    PriceSeries::from_pairs(
        "P",
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (start + chrono::Days::new(i as u64), *v)),
    )
}

proptest! {
    /// Any series shorter than max(hold_days + 1, 21) is rejected.
    #[test]
    fn short_series_rejected(hold_days in 1usize..40, prices in arb_prices(0..60)) {
        let engine = FeatureEngine::new(FeatureConfig { hold_days, ..Default::default() }).unwrap();
        let required = (hold_days + 1).max(21);
        let result = engine.compute(&to_series(&prices));

        if prices.len() < required {
            let short = result.unwrap_err();
            prop_assert_eq!(short.required, required);
            prop_assert_eq!(short.available, prices.len());
        } else {
            prop_assert!(result.is_ok());
        }
    }

    /// Drawdown is never positive and vanishes only on non-decreasing windows.
    #[test]
    fn drawdown_non_positive(prices in arb_prices(21..80)) {
        let engine = FeatureEngine::default();
        let features = engine.compute(&to_series(&prices)).unwrap();

        prop_assert!(features.mdd_20 <= 0.0);

        let window = &prices[prices.len() - FEATURE_WINDOW..];
        let non_decreasing = window.windows(2).all(|w| w[1] >= w[0]);
        prop_assert_eq!(features.mdd_20 == 0.0, non_decreasing);
    }

    /// Bounded features stay bounded.
    #[test]
    fn ratios_bounded(prices in arb_prices(21..80)) {
        let engine = FeatureEngine::default();
        let features = engine.compute(&to_series(&prices)).unwrap();

        prop_assert!((0.0..=1.0).contains(&features.pos_ratio_20));
        prop_assert!(features.vol_20 >= 0.0);
        prop_assert!(features.ret_hold_over_cap >= 0.0);
        prop_assert!(features.bias_20_over >= 0.0);
        prop_assert!(features.ret_hold > -1.0);
    }
}
