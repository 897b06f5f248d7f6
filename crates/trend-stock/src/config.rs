//! Configuration for stock trend analysis

use crate::api::yahoo::lookback_start;
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use trend_core::TrainingConfig;

/// Environment variable holding a comma-separated symbol list
pub const SYMBOLS_ENV: &str = "TREND_SYMBOLS";

/// Upper bound on attempts per price history request
pub const MAX_RETRIES: u32 = 10;

/// Longest single wait between retries
pub const MAX_RETRY_BACKOFF: Duration = Duration::from_secs(60);

/// Symbols analysed when none are configured
pub const DEFAULT_SYMBOLS: [&str; 3] = ["PETR4.SA", "BBAS3.SA", "ELET3.SA"];

/// Configuration for a batch of symbol analyses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Symbols to analyse, in order
    pub symbols: Vec<String>,

    /// Lookback range passed to the price source (e.g. "1y", "6mo")
    pub range: String,

    /// Gradient descent hyperparameters
    pub training: TrainingConfig,

    /// Forecast offsets counted from the day after the series ends (0 = next trading day)
    pub forecast_offsets: Vec<u32>,

    /// Maximum number of attempts for a price history request
    pub max_retries: u32,

    /// Initial backoff duration for retries
    pub retry_backoff_base: Duration,

    /// Request budget for the price source
    pub requests_per_minute: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(ToString::to_string).collect(),
            range: "1y".to_string(),
            training: TrainingConfig::default(),
            forecast_offsets: vec![0, 5, 10],
            max_retries: 3,
            retry_backoff_base: Duration::from_secs(1),
            requests_per_minute: 60,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            return Err(AnalysisError::ConfigError(
                "symbol list must not be empty".to_string(),
            ));
        }

        if let Some(blank) = self.symbols.iter().position(|s| s.trim().is_empty()) {
            return Err(AnalysisError::ConfigError(format!(
                "symbol at position {blank} is blank"
            )));
        }

        lookback_start(&self.range, chrono::Utc::now())?;

        self.training
            .validate()
            .map_err(|e| AnalysisError::ConfigError(e.to_string()))?;

        if self.max_retries == 0 || self.max_retries > MAX_RETRIES {
            return Err(AnalysisError::ConfigError(format!(
                "max_retries must be between 1 and {MAX_RETRIES}, got {}",
                self.max_retries
            )));
        }

        if self.requests_per_minute == 0 {
            return Err(AnalysisError::ConfigError(
                "requests_per_minute must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Get retry backoff duration for attempt number, capped at [`MAX_RETRY_BACKOFF`]
    pub fn retry_backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.retry_backoff_base
            .saturating_mul(factor)
            .min(MAX_RETRY_BACKOFF)
    }
}

fn symbols_from_env() -> Option<Vec<String>> {
    let raw = std::env::var(SYMBOLS_ENV).ok()?;
    let symbols = parse_symbols(&raw);
    (!symbols.is_empty()).then_some(symbols)
}

/// Split a comma-separated symbol list, upper-casing and dropping blanks
pub fn parse_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase)
        .collect()
}

/// Builder for AnalysisConfig
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    symbols: Option<Vec<String>>,
    range: Option<String>,
    training: Option<TrainingConfig>,
    forecast_offsets: Option<Vec<u32>>,
    max_retries: Option<u32>,
    retry_backoff_base: Option<Duration>,
    requests_per_minute: Option<u32>,
}

impl AnalysisConfigBuilder {
    /// Set the symbols to analyse
    pub fn symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symbols = Some(symbols.into_iter().map(Into::into).collect());
        self
    }

    /// Set the lookback range
    pub fn range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    /// Set the gradient descent hyperparameters
    pub fn training(mut self, training: TrainingConfig) -> Self {
        self.training = Some(training);
        self
    }

    /// Set the forecast horizons
    pub fn forecast_offsets(mut self, offsets: Vec<u32>) -> Self {
        self.forecast_offsets = Some(offsets);
        self
    }

    /// Set maximum retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set retry backoff base duration
    pub fn retry_backoff_base(mut self, duration: Duration) -> Self {
        self.retry_backoff_base = Some(duration);
        self
    }

    /// Set the request budget per minute
    pub fn requests_per_minute(mut self, requests: u32) -> Self {
        self.requests_per_minute = Some(requests);
        self
    }

    /// Load symbols from `TREND_SYMBOLS` unless already set
    pub fn with_env_symbols(mut self) -> Self {
        if self.symbols.is_none() {
            self.symbols = symbols_from_env();
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AnalysisConfig> {
        let defaults = AnalysisConfig::default();

        let config = AnalysisConfig {
            symbols: self.symbols.unwrap_or(defaults.symbols),
            range: self.range.unwrap_or(defaults.range),
            training: self.training.unwrap_or(defaults.training),
            forecast_offsets: self.forecast_offsets.unwrap_or(defaults.forecast_offsets),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_backoff_base: self.retry_backoff_base.unwrap_or(defaults.retry_backoff_base),
            requests_per_minute: self.requests_per_minute.unwrap_or(defaults.requests_per_minute),
        };

        config.validate()?;
        Ok(config)
    }
}
