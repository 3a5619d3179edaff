//! Broad-market risk-on/risk-off regime.

use navpick_traits::stats::mean;
use navpick_traits::{NavpickError, PriceSeries, Result, Symbol};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How a risk-off regime affects selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketFilterMode {
    /// The regime is informational only; selection proceeds.
    #[default]
    Warn,
    /// A risk-off regime halts selection with an empty result.
    Block,
}

impl std::fmt::Display for MarketFilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warn => write!(f, "warn"),
            Self::Block => write!(f, "block"),
        }
    }
}

impl std::str::FromStr for MarketFilterMode {
    type Err = NavpickError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "warn" => Ok(Self::Warn),
            "block" => Ok(Self::Block),
            other => Err(NavpickError::InvalidParameter(format!(
                "unknown market filter mode '{other}', expected warn or block"
            ))),
        }
    }
}

/// Configuration for the market regime filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeConfig {
    /// Whether the regime is computed at all.
    pub enabled: bool,
    /// Identifier of the broad-market index.
    pub index_id: Symbol,
    /// Moving-average window in observations.
    pub ma_window: usize,
    /// Effect of a risk-off regime.
    pub mode: MarketFilterMode,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            index_id: "sh000300".to_string(),
            ma_window: 20,
            mode: MarketFilterMode::Warn,
        }
    }
}

impl RegimeConfig {
    /// Checks the configuration preconditions.
    ///
    /// # Errors
    ///
    /// Returns [`NavpickError::InvalidParameter`] when `ma_window` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.ma_window == 0 {
            return Err(NavpickError::InvalidParameter(
                "market ma_window must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Snapshot of the broad market at its latest close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRegime {
    /// Index identifier.
    pub index_id: Symbol,
    /// Latest close.
    pub last_close: f64,
    /// Mean of the last `ma_window` closes.
    pub ma_window_mean: f64,
    /// Relative deviation of the close from the mean.
    pub bias: f64,
    /// `last_close >= ma_window_mean`.
    pub risk_on: bool,
}

impl MarketRegime {
    /// Computes the regime of an index series.
    ///
    /// The comparison is inclusive: a close exactly on its moving average is
    /// risk-on. Returns `None` (filter disabled for this run) when the series
    /// is shorter than `ma_window` or `ma_window` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use navpick_select::MarketRegime;
    /// use navpick_traits::{Date, PriceSeries};
    ///
    /// let start = Date::from_ymd_opt(2024, 1, 1).unwrap();
    /// let index = PriceSeries::from_pairs(
    ///     "sh000300",
    ///     (0..5).map(|i| (start + chrono::Days::new(i), 100.0 + i as f64)),
    /// );
    /// let regime = MarketRegime::compute(&index, 5).unwrap();
    /// assert!(regime.risk_on);
    /// assert_eq!(regime.ma_window_mean, 102.0);
    /// ```
    pub fn compute(index: &PriceSeries, ma_window: usize) -> Option<Self> {
        if ma_window == 0 || index.len() < ma_window {
            return None;
        }

        let closes = index.values();
        let last_close = *closes.last()?;
        let ma_window_mean = mean(&closes[closes.len() - ma_window..])?;
        let (bias, risk_on) = if ma_window_mean != 0.0 {
            (
                (last_close - ma_window_mean) / ma_window_mean,
                last_close >= ma_window_mean,
            )
        } else {
            (0.0, true)
        };

        Some(Self {
            index_id: index.id().to_string(),
            last_close,
            ma_window_mean,
            bias,
            risk_on,
        })
    }
}

impl std::fmt::Display for MarketRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} | close={:.2} | ma={:.2} | bias={:.2}% | {}",
            self.index_id,
            self.last_close,
            self.ma_window_mean,
            self.bias * 100.0,
            if self.risk_on { "risk-on" } else { "risk-off" }
        )
    }
}

/// Applies a [`RegimeConfig`] to an optional index series.
#[derive(Debug, Clone, Default)]
pub struct MarketRegimeFilter {
    config: RegimeConfig,
}

impl MarketRegimeFilter {
    /// Creates a filter after validating its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if [`RegimeConfig::validate`] fails.
    pub fn new(config: RegimeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The filter configuration.
    pub const fn config(&self) -> &RegimeConfig {
        &self.config
    }

    /// The configured filter mode.
    pub const fn mode(&self) -> MarketFilterMode {
        self.config.mode
    }

    /// Computes the regime, or `None` when disabled or unavailable.
    pub fn evaluate(&self, index: Option<&PriceSeries>) -> Option<MarketRegime> {
        if !self.config.enabled {
            return None;
        }

        let Some(index) = index else {
            warn!(index = %self.config.index_id, "market index series missing, regime filter skipped");
            return None;
        };

        let regime = MarketRegime::compute(index, self.config.ma_window);
        if regime.is_none() {
            warn!(
                index = index.id(),
                available = index.len(),
                ma_window = self.config.ma_window,
                "market index history too short, regime filter skipped"
            );
        }
        regime
    }
}
