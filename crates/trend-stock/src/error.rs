//! Error types for stock trend analysis

use thiserror::Error;
use trend_core::RegressionError;

/// Stock analysis specific errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable {
        symbol: String,
        reason: String,
    },

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Unsupported lookback range
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Trend fitting or evaluation failed
    #[error("Regression error: {0}")]
    Regression(#[from] RegressionError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O error while exporting results
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    /// Short machine-friendly label for logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::DataUnavailable { .. } => "data_unavailable",
            AnalysisError::YahooFinanceError(_) => "yahoo_finance",
            AnalysisError::InvalidRange(_) => "invalid_range",
            AnalysisError::Regression(RegressionError::DegenerateInput(_)) => "degenerate_input",
            AnalysisError::Regression(RegressionError::UndefinedMetric(_)) => "undefined_metric",
            AnalysisError::Regression(_) => "regression",
            AnalysisError::ConfigError(_) => "config",
            AnalysisError::Io(_) => "io",
            AnalysisError::JsonError(_) => "json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalysisError::InvalidRange("7w".to_string());
        assert_eq!(err.to_string(), "Invalid range: 7w");

        let err = AnalysisError::DataUnavailable {
            symbol: "PETR4.SA".to_string(),
            reason: "No data found".to_string(),
        };
        assert_eq!(err.to_string(), "Data not available for PETR4.SA: No data found");
    }

    #[test]
    fn test_regression_conversion() {
        let err: AnalysisError = RegressionError::UndefinedMetric("flat".to_string()).into();
        assert_eq!(err.kind(), "undefined_metric");
        assert!(err.to_string().contains("Undefined metric"));

        let err: AnalysisError = RegressionError::DegenerateInput("m=1".to_string()).into();
        assert_eq!(err.kind(), "degenerate_input");
    }
}
