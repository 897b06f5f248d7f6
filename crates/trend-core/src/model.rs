//! Single-use trend model over one price series

use crate::config::TrainingConfig;
use crate::error::Result;
use crate::gradient::{Parameters, predict};
use crate::metrics::{FitMetrics, evaluate, residuals};
use crate::normalize::{Normalization, normalize, time_index};
use crate::train::{TrainingOutcome, train};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Intercept and slope expressed in price units per day index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    pub intercept: f64,
    pub slope: f64,
}

/// Direction of the fitted line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Up => write!(f, "up"),
            Trend::Down => write!(f, "down"),
        }
    }
}

/// Fits price against day index `0..m-1`
///
/// A model is consumed by [`TrendModel::fit`]; every series gets its own
/// model, normalization and parameters.
#[derive(Debug, Clone, Default)]
pub struct TrendModel {
    config: TrainingConfig,
}

impl TrendModel {
    /// Create a model, rejecting invalid hyperparameters up front
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Normalize the time index, train, predict and evaluate
    pub fn fit(self, prices: &[f64]) -> Result<FittedTrend> {
        let y = Array1::from(prices.to_vec());
        let (x, normalization) = normalize(&time_index(y.len()))?;
        let training = train(&x, &y, &self.config)?;
        let predictions = predict(training.params, &x);
        let metrics = evaluate(&y, &predictions)?;

        debug!(
            samples = prices.len(),
            iterations = training.iterations,
            converged = training.converged,
            r2 = metrics.r2,
            "trend fitted"
        );

        Ok(FittedTrend {
            residuals: residuals(&y, &predictions).to_vec(),
            predictions: predictions.to_vec(),
            normalization,
            training,
            metrics,
        })
    }
}

/// A trained trend line together with its diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedTrend {
    normalization: Normalization,
    training: TrainingOutcome,
    predictions: Vec<f64>,
    residuals: Vec<f64>,
    metrics: FitMetrics,
}

impl FittedTrend {
    /// Parameters in normalized feature space
    pub fn params(&self) -> Parameters {
        self.training.params
    }

    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    pub fn training(&self) -> &TrainingOutcome {
        &self.training
    }

    /// Fitted prices for each input day
    pub fn predictions(&self) -> &[f64] {
        &self.predictions
    }

    /// Actual minus fitted price for each input day
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// R²/MSE against the original prices
    pub fn metrics(&self) -> FitMetrics {
        self.metrics
    }

    /// De-normalized intercept and slope
    pub fn coefficients(&self) -> Coefficients {
        let Parameters { theta0, theta1 } = self.training.params;
        let Normalization { mean, std_dev } = self.normalization;
        Coefficients {
            intercept: theta0 - theta1 * mean / std_dev,
            slope: theta1 / std_dev,
        }
    }

    pub fn trend(&self) -> Trend {
        if self.coefficients().slope > 0.0 {
            Trend::Up
        } else {
            Trend::Down
        }
    }

    /// Predict at a raw day index, including days past the end of the series
    pub fn predict_day(&self, day: f64) -> f64 {
        self.training.params.hypothesis(self.normalization.apply(day))
    }

    pub fn predict_days(&self, days: &[f64]) -> Vec<f64> {
        days.iter().map(|&day| self.predict_day(day)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegressionError;

    #[test]
    fn test_upward_four_point_series() {
        let prices = [10.0, 12.0, 14.0, 16.0];
        let fitted = TrendModel::default().fit(&prices).unwrap();

        assert!(fitted.training().converged);
        assert!(fitted.params().theta1 > 0.0);
        assert_eq!(fitted.trend(), Trend::Up);
        assert!(fitted.metrics().r2 > 0.99);
        assert!(fitted.metrics().mse < 0.1);
    }

    #[test]
    fn test_exact_line_recovers_coefficients() {
        let prices: Vec<f64> = (0..30).map(|i| 3.0 + 2.0 * f64::from(i)).collect();
        let config = TrainingConfig::default()
            .with_learning_rate(0.1)
            .with_tolerance(1e-14);
        let fitted = TrendModel::new(config).unwrap().fit(&prices).unwrap();

        let coefficients = fitted.coefficients();
        assert!((coefficients.intercept - 3.0).abs() < 1e-3);
        assert!((coefficients.slope - 2.0).abs() < 1e-3);
        assert!(fitted.training().final_cost() < 1e-8);
        assert!((fitted.metrics().r2 - 1.0).abs() < 1e-9);
        assert!(fitted.metrics().mse < 1e-8);

        for (p, y) in fitted.predictions().iter().zip(&prices) {
            assert!((p - y).abs() < 1e-3);
        }
        // day 30 is one past the end of the series
        assert!((fitted.predict_day(30.0) - 63.0).abs() < 1e-3);
    }

    #[test]
    fn test_residual_mean_near_zero_at_convergence() {
        let prices = [
            21.4, 22.0, 21.1, 23.5, 24.2, 23.9, 25.0, 24.4, 26.1, 27.3, 26.8, 28.0,
        ];
        let config = TrainingConfig::default()
            .with_learning_rate(0.1)
            .with_tolerance(1e-14);
        let fitted = TrendModel::new(config).unwrap().fit(&prices).unwrap();

        let mean = fitted.residuals().iter().sum::<f64>() / prices.len() as f64;
        assert!(mean.abs() < 1e-4, "residual mean {mean}");
    }

    #[test]
    fn test_downward_series() {
        let prices = [30.0, 29.0, 27.5, 27.0, 25.0];
        let fitted = TrendModel::default().fit(&prices).unwrap();
        assert_eq!(fitted.trend(), Trend::Down);
        assert!(fitted.coefficients().slope < 0.0);
    }

    #[test]
    fn test_single_price_is_degenerate() {
        let err = TrendModel::default().fit(&[42.0]).unwrap_err();
        assert!(matches!(err, RegressionError::DegenerateInput(_)));
    }

    #[test]
    fn test_constant_prices_flag_undefined_metric() {
        let err = TrendModel::default().fit(&[10.0; 8]).unwrap_err();
        assert!(matches!(err, RegressionError::UndefinedMetric(_)));
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = TrainingConfig::default().with_learning_rate(-0.1);
        assert!(TrendModel::new(config).is_err());
    }

    #[test]
    fn test_predict_days_matches_predictions() {
        let prices = [5.0, 5.5, 5.2, 6.1, 6.4];
        let fitted = TrendModel::default().fit(&prices).unwrap();
        let days: Vec<f64> = (0..prices.len()).map(|i| i as f64).collect();
        for (a, b) in fitted.predict_days(&days).iter().zip(fitted.predictions()) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}
