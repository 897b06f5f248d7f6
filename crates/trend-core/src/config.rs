//! Hyperparameters for gradient descent

use crate::error::{RegressionError, Result};
use serde::{Deserialize, Serialize};

/// Default step size
pub const DEFAULT_LEARNING_RATE: f64 = 0.01;
/// Default iteration cap
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;
/// Default convergence tolerance on the change in cost
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Configuration for a single training run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Step size applied to both gradients
    pub learning_rate: f64,

    /// Hard cap on the number of iterations
    pub max_iterations: usize,

    /// Training stops once consecutive costs differ by less than this
    pub tolerance: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl TrainingConfig {
    /// Set the learning rate
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the iteration cap
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(RegressionError::InvalidConfig(format!(
                "learning_rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }

        if self.max_iterations == 0 {
            return Err(RegressionError::InvalidConfig(
                "max_iterations must be greater than 0".to_string(),
            ));
        }

        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(RegressionError::InvalidConfig(format!(
                "tolerance must be a non-negative finite number, got {}",
                self.tolerance
            )));
        }

        Ok(())
    }
}
