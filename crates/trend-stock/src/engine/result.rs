//! Analysis result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trend_core::{Coefficients, FitMetrics, Normalization, Parameters, Trend};

use crate::error::AnalysisError;
use crate::source::PriceSeries;
use crate::stats::DescriptiveStats;

/// Fitted price at a day past the end of the series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Offset from the day after the series ends
    pub offset: u32,
    /// Day index the forecast was evaluated at
    pub day_index: usize,
    pub price: f64,
}

/// How gradient descent finished
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub iterations: usize,
    pub converged: bool,
    pub final_cost: f64,
    pub learning_rate: f64,
}

/// Everything known about one symbol's trend fit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    pub symbol: String,
    pub source: String,
    pub range: String,
    pub series: PriceSeries,
    pub stats: DescriptiveStats,
    pub coefficients: Coefficients,
    pub params: Parameters,
    pub normalization: Normalization,
    pub trend: Trend,
    pub metrics: FitMetrics,
    pub predictions: Vec<f64>,
    pub residuals: Vec<f64>,
    pub forecasts: Vec<Forecast>,
    pub training: TrainingSummary,
    pub timestamp: DateTime<Utc>,
}

impl TrendReport {
    pub fn summary(&self) -> String {
        format!(
            "{} trend {} - slope {:.6}/day, R² {:.4} ({} days, {})",
            self.symbol,
            self.trend,
            self.coefficients.slope,
            self.metrics.r2,
            self.stats.count,
            self.timestamp.format("%Y-%m-%d %H:%M UTC")
        )
    }
}

/// Outcome of analysing a single symbol
#[derive(Debug)]
pub struct SymbolAnalysis {
    pub symbol: String,
    pub outcome: Result<TrendReport, AnalysisError>,
}

impl SymbolAnalysis {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Per-symbol outcomes of one batch run, in symbol order
#[derive(Debug)]
pub struct BatchReport {
    pub entries: Vec<SymbolAnalysis>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn reports(&self) -> impl Iterator<Item = &TrendReport> {
        self.entries.iter().filter_map(|e| e.outcome.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &AnalysisError)> {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.as_ref().err().map(|err| (e.symbol.as_str(), err)))
    }

    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(SymbolAnalysis::is_success)
    }

    pub fn success_rate(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        self.reports().count() as f64 / self.entries.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(symbol: &str) -> SymbolAnalysis {
        SymbolAnalysis {
            symbol: symbol.to_string(),
            outcome: Err(AnalysisError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "empty".to_string(),
            }),
        }
    }

    #[test]
    fn test_empty_batch() {
        let now = Utc::now();
        let batch = BatchReport {
            entries: Vec::new(),
            started_at: now,
            finished_at: now,
        };
        assert!((batch.success_rate() - 0.0).abs() < f64::EPSILON);
        assert!(batch.is_complete());
    }

    #[test]
    fn test_failures_listed_in_order() {
        let now = Utc::now();
        let batch = BatchReport {
            entries: vec![failed("A"), failed("B")],
            started_at: now,
            finished_at: now,
        };
        let symbols: Vec<&str> = batch.failures().map(|(s, _)| s).collect();
        assert_eq!(symbols, vec!["A", "B"]);
        assert!(!batch.is_complete());
        assert_eq!(batch.reports().count(), 0);
    }
}
