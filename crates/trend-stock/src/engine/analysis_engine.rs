//! Trend analyzer - fetches history and runs the regression engine per symbol

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use trend_core::TrendModel;

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::source::{PriceSeries, PriceSource};
use crate::stats::DescriptiveStats;

use super::result::{BatchReport, Forecast, SymbolAnalysis, TrainingSummary, TrendReport};

/// Runs trend analysis for the configured symbols, one after another
pub struct TrendAnalyzer {
    source: Arc<dyn PriceSource>,
    config: Arc<AnalysisConfig>,
}

impl TrendAnalyzer {
    /// Create an analyzer; misconfiguration is reported here, before any fetch
    pub fn new(source: Arc<dyn PriceSource>, config: Arc<AnalysisConfig>) -> Result<Self> {
        config.validate()?;
        Ok(Self { source, config })
    }

    /// Analyse every configured symbol
    ///
    /// A failing symbol is recorded in the batch and does not stop the rest.
    pub async fn analyze_all(&self) -> BatchReport {
        let started_at = Utc::now();
        let mut entries = Vec::with_capacity(self.config.symbols.len());

        for symbol in &self.config.symbols {
            info!(symbol = %symbol, "analysing");
            let outcome = self.analyze_symbol(symbol).await;

            match &outcome {
                Ok(report) => info!(symbol = %symbol, "{}", report.summary()),
                Err(e) => warn!(symbol = %symbol, kind = e.kind(), error = %e, "analysis failed"),
            }

            entries.push(SymbolAnalysis {
                symbol: symbol.clone(),
                outcome,
            });
        }

        BatchReport {
            entries,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Fetch history for `symbol` and analyse it
    pub async fn analyze_symbol(&self, symbol: &str) -> Result<TrendReport> {
        let series = self.source.fetch_closes(symbol, &self.config.range).await?;
        self.analyze_series(series)
    }

    /// Fit and summarise an already fetched series
    pub fn analyze_series(&self, series: PriceSeries) -> Result<TrendReport> {
        if series.is_empty() {
            return Err(AnalysisError::DataUnavailable {
                symbol: series.symbol,
                reason: "price source returned no data".to_string(),
            });
        }

        let closes = series.closes();
        let fitted = TrendModel::new(self.config.training)?.fit(&closes)?;

        let stats = DescriptiveStats::from_prices(&closes).ok_or_else(|| {
            AnalysisError::DataUnavailable {
                symbol: series.symbol.clone(),
                reason: "no prices to summarise".to_string(),
            }
        })?;

        let forecasts = self
            .config
            .forecast_offsets
            .iter()
            .map(|&offset| {
                let day_index = closes.len() + offset as usize;
                Forecast {
                    offset,
                    day_index,
                    price: fitted.predict_day(day_index as f64),
                }
            })
            .collect();

        let training = fitted.training();
        let training = TrainingSummary {
            iterations: training.iterations,
            converged: training.converged,
            final_cost: training.final_cost(),
            learning_rate: self.config.training.learning_rate,
        };

        Ok(TrendReport {
            symbol: series.symbol.clone(),
            source: self.source.name().to_string(),
            range: self.config.range.clone(),
            stats,
            coefficients: fitted.coefficients(),
            params: fitted.params(),
            normalization: fitted.normalization(),
            trend: fitted.trend(),
            metrics: fitted.metrics(),
            predictions: fitted.predictions().to_vec(),
            residuals: fitted.residuals().to_vec(),
            forecasts,
            training,
            series,
            timestamp: Utc::now(),
        })
    }
}
