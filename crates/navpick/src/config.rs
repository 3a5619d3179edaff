//! Run configuration.
//!
//! Every tunable lives in one [`NavpickConfig`] value handed to the
//! [`Pipeline`](crate::Pipeline). Missing TOML keys fall back to defaults.

use navpick_features::FeatureConfig;
use navpick_score::ScoreWeights;
use navpick_select::{RegimeConfig, SelectionConfig};
use navpick_traits::{NavpickError, Result};
use serde::{Deserialize, Serialize};

/// Complete configuration of a selection or backtest run.
///
/// # Example
///
/// ```
/// use navpick::NavpickConfig;
///
/// let config = NavpickConfig::from_toml_str(
///     r#"
///     [features]
///     hold_days = 5
///
///     [selection]
///     top_n = 3
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.features.hold_days, 5);
/// assert_eq!(config.selection.top_n, 3);
/// assert_eq!(config.selection.max_pair_corr, 0.80);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavpickConfig {
    /// Feature extraction windows and soft caps.
    pub features: FeatureConfig,
    /// Coefficients of the composite score.
    pub weights: ScoreWeights,
    /// Market regime filter.
    pub regime: RegimeConfig,
    /// Eligibility filters and diversified selection.
    pub selection: SelectionConfig,
}

impl NavpickConfig {
    /// Parses a TOML document; absent sections and keys take their defaults.
    ///
    /// The result is validated before it is returned.
    ///
    /// # Errors
    ///
    /// Returns [`NavpickError::InvalidData`] for malformed TOML and
    /// [`NavpickError::InvalidParameter`] when a value fails validation.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)
            .map_err(|e| NavpickError::InvalidData(format!("malformed config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`NavpickError::Other`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| NavpickError::Other(e.to_string()))
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns the first [`NavpickError::InvalidParameter`] found.
    pub fn validate(&self) -> Result<()> {
        self.features.validate()?;
        self.weights.validate()?;
        self.regime.validate()?;
        self.selection.validate()
    }
}
