//! Error types for navpick.
//!
//! Only programmer errors and malformed input are errors. Expected outcomes
//! such as a short price history or an unavailable market regime are
//! modelled as ordinary return values by the engines that produce them.

use thiserror::Error;

/// The main error type for navpick operations.
#[derive(Debug, Error)]
pub enum NavpickError {
    /// A configuration value violates its precondition (e.g. `top_n == 0`).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error when a required column is missing from a DataFrame.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for NavpickError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for NavpickError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for navpick operations.
pub type Result<T> = std::result::Result<T, NavpickError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NavpickError::InvalidParameter("top_n must be at least 1".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: top_n must be at least 1");

        let err = NavpickError::MissingColumn("date".to_string());
        assert_eq!(err.to_string(), "Missing required column: date");
    }

    #[test]
    fn test_error_from_str() {
        let err: NavpickError = "boom".into();
        assert!(matches!(err, NavpickError::Other(ref s) if s == "boom"));
    }
}
