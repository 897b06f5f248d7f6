//! Stock price trend analysis
//!
//! Fetches daily close history for a list of ticker symbols and fits a
//! linear trend to each one with [`trend_core`]. It includes:
//!
//! - Price history from Yahoo Finance, rate limited and retried
//! - Descriptive statistics over raw closes
//! - Per-symbol trend reports with forecasts and fit quality
//! - Batch runs where one failing symbol never stops the rest
//! - Text and JSON formatting, and chart data export
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use trend_stock::{AnalysisConfig, FormatterFactory, OutputFormat, TrendAnalyzer, YahooFinanceClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(AnalysisConfig::builder().with_env_symbols().build()?);
//!     let source = Arc::new(YahooFinanceClient::new(config.clone())?);
//!
//!     let analyzer = TrendAnalyzer::new(source, config)?;
//!     let batch = analyzer.analyze_all().await;
//!
//!     println!("{}", FormatterFactory::create(OutputFormat::Text).format_batch(&batch)?);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod interface;
pub mod source;
pub mod stats;

pub use api::{YahooFinanceClient, lookback_start};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, DEFAULT_SYMBOLS, SYMBOLS_ENV, parse_symbols};
pub use engine::{BatchReport, Forecast, SymbolAnalysis, TrainingSummary, TrendAnalyzer, TrendReport};
pub use error::{AnalysisError, Result};
pub use interface::{ChartData, Formatter, FormatterFactory, OutputFormat};
pub use source::{PricePoint, PriceSeries, PriceSource};
pub use stats::DescriptiveStats;
