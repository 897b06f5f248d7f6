//! Batch gradient descent

use crate::config::TrainingConfig;
use crate::error::{RegressionError, Result};
use crate::gradient::{Parameters, cost, gradients};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Iterations between progress log lines
const PROGRESS_INTERVAL: usize = 100;

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingOutcome {
    /// Final parameters in normalized feature space
    pub params: Parameters,
    /// Cost recorded at the start of every iteration
    pub cost_trace: Vec<f64>,
    /// Number of iterations run
    pub iterations: usize,
    /// `true` when the tolerance test stopped training before the cap
    pub converged: bool,
}

impl TrainingOutcome {
    /// Last recorded cost
    pub fn final_cost(&self) -> f64 {
        self.cost_trace.last().copied().unwrap_or(f64::NAN)
    }
}

/// Fit `(θ0, θ1)` to `(x, y)` by batch gradient descent from zero
///
/// Every iteration records the current cost, then stops if it moved by less
/// than `tolerance` since the previous iteration. Otherwise both parameters
/// are updated from the same gradient snapshot.
pub fn train(x: &Array1<f64>, y: &Array1<f64>, config: &TrainingConfig) -> Result<TrainingOutcome> {
    config.validate()?;

    if x.len() != y.len() {
        return Err(RegressionError::DimensionMismatch {
            expected: x.len(),
            got: y.len(),
        });
    }
    if x.is_empty() {
        return Err(RegressionError::DegenerateInput(
            "cannot train on an empty series".to_string(),
        ));
    }
    if let Some(index) = x.iter().chain(y).position(|v| !v.is_finite()) {
        return Err(RegressionError::NonFinite {
            index: index % x.len(),
        });
    }

    let mut params = Parameters::default();
    let mut cost_trace = Vec::with_capacity(config.max_iterations);
    let mut previous: Option<f64> = None;
    let mut converged = false;

    for iteration in 0..config.max_iterations {
        let current = cost(params, x, y);
        if !current.is_finite() {
            return Err(RegressionError::Diverged {
                iteration,
                learning_rate: config.learning_rate,
            });
        }
        cost_trace.push(current);

        if previous.is_some_and(|prev: f64| (current - prev).abs() < config.tolerance) {
            debug!(iteration, cost = current, "gradient descent converged");
            converged = true;
            break;
        }
        previous = Some(current);

        let (g0, g1) = gradients(params, x, y);
        params = Parameters {
            theta0: params.theta0 - config.learning_rate * g0,
            theta1: params.theta1 - config.learning_rate * g1,
        };

        if (iteration + 1) % PROGRESS_INTERVAL == 0 {
            debug!(iteration = iteration + 1, cost = current, "training progress");
        }
    }

    if !converged {
        warn!(
            max_iterations = config.max_iterations,
            cost = cost_trace.last().copied().unwrap_or(f64::NAN),
            "gradient descent hit the iteration cap before converging"
        );
    }

    Ok(TrainingOutcome {
        params,
        iterations: cost_trace.len(),
        cost_trace,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::predict;
    use crate::normalize::{normalize, time_index};
    use ndarray::array;

    fn tight() -> TrainingConfig {
        TrainingConfig::default()
            .with_learning_rate(0.1)
            .with_max_iterations(10_000)
            .with_tolerance(1e-14)
    }

    #[test]
    fn test_recovers_exact_line() {
        let days = time_index(20);
        let prices = days.mapv(|d| 3.0 + 2.0 * d);
        let (x, norm) = normalize(&days).unwrap();

        let outcome = train(&x, &prices, &tight()).unwrap();
        assert!(outcome.converged);
        assert!(outcome.final_cost() < 1e-8);

        for (predicted, actual) in predict(outcome.params, &x).iter().zip(&prices) {
            assert!((predicted - actual).abs() < 1e-3);
        }

        // slope in original units is θ1 / std
        assert!((outcome.params.theta1 / norm.std_dev - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_cost_trace_is_non_increasing() {
        let prices = array![
            31.2, 30.8, 32.5, 33.0, 31.9, 34.4, 35.1, 34.0, 36.2, 37.5, 36.9, 38.8,
        ];
        let (x, _) = normalize(&time_index(prices.len())).unwrap();

        for rate in [0.001, 0.01, 0.1, 0.5, 1.0] {
            let config = TrainingConfig::default().with_learning_rate(rate);
            let outcome = train(&x, &prices, &config).unwrap();
            for pair in outcome.cost_trace.windows(2) {
                assert!(
                    pair[1] <= pair[0] + 1e-9,
                    "rate {rate}: cost rose from {} to {}",
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    #[test]
    fn test_stops_at_iteration_cap() {
        let (x, _) = normalize(&time_index(5)).unwrap();
        let y = array![1.0, 2.0, 4.0, 3.0, 5.0];
        let config = TrainingConfig::default()
            .with_max_iterations(7)
            .with_tolerance(0.0);

        let outcome = train(&x, &y, &config).unwrap();
        assert!(!outcome.converged);
        assert_eq!(outcome.iterations, 7);
        assert_eq!(outcome.cost_trace.len(), 7);
    }

    #[test]
    fn test_first_iteration_uses_zero_parameters() {
        let (x, _) = normalize(&time_index(4)).unwrap();
        let y = array![10.0, 12.0, 14.0, 16.0];
        let config = TrainingConfig::default().with_max_iterations(1);

        let outcome = train(&x, &y, &config).unwrap();
        // (100 + 144 + 196 + 256) / 8
        assert!((outcome.cost_trace[0] - 87.0).abs() < 1e-12);
        // one step of 0.01 towards mean(y) = 13
        assert!((outcome.params.theta0 - 0.13).abs() < 1e-12);
    }

    #[test]
    fn test_simultaneous_update() {
        // With θ0 updated first, θ1's gradient would change. Compare to a
        // hand-computed step from the zero snapshot.
        let x = array![-1.0, 1.0];
        let y = array![0.0, 4.0];
        let config = TrainingConfig::default()
            .with_learning_rate(0.5)
            .with_max_iterations(1);

        let outcome = train(&x, &y, &config).unwrap();
        // g0 = mean(-y) = -2, g1 = mean(-y * x) = -2
        assert!((outcome.params.theta0 - 1.0).abs() < 1e-12);
        assert!((outcome.params.theta1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_divergence_is_reported() {
        let (x, _) = normalize(&time_index(10)).unwrap();
        let y = time_index(10) * 1e3;
        let config = TrainingConfig::default()
            .with_learning_rate(50.0)
            .with_max_iterations(1000)
            .with_tolerance(0.0);

        let err = train(&x, &y, &config).unwrap_err();
        assert!(matches!(err, RegressionError::Diverged { .. }));
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        let err = train(&array![0.0, 1.0], &array![1.0], &TrainingConfig::default()).unwrap_err();
        assert_eq!(err, RegressionError::DimensionMismatch { expected: 2, got: 1 });
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = TrainingConfig::default().with_max_iterations(0);
        let err = train(&array![0.0, 1.0], &array![1.0, 2.0], &config).unwrap_err();
        assert!(matches!(err, RegressionError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_non_finite_target() {
        let err = train(&array![-1.0, 1.0], &array![1.0, f64::INFINITY], &TrainingConfig::default())
            .unwrap_err();
        assert_eq!(err, RegressionError::NonFinite { index: 1 });
    }
}
