//! Trend analysis engine
//!
//! Coordination layer between the price source and the regression engine

pub mod analysis_engine;
pub mod result;

pub use analysis_engine::TrendAnalyzer;
pub use result::{BatchReport, Forecast, SymbolAnalysis, TrainingSummary, TrendReport};
