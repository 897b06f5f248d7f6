//! Cost function, gradients and the linear hypothesis
//!
//! All functions here operate on the normalized feature `x'` and expect
//! `x` and `y` to have the same, non-zero length. [`crate::train`] checks
//! that before calling into them.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Intercept and slope of the hypothesis `θ0 + θ1·x'`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub theta0: f64,
    pub theta1: f64,
}

impl Parameters {
    pub fn new(theta0: f64, theta1: f64) -> Self {
        Self { theta0, theta1 }
    }

    /// Hypothesis value for one feature
    #[inline]
    pub fn hypothesis(&self, x: f64) -> f64 {
        self.theta0 + self.theta1 * x
    }
}

/// Halved mean squared error `J = (1/2m) Σ (θ0 + θ1·x_i − y_i)²`
pub fn cost(params: Parameters, x: &Array1<f64>, y: &Array1<f64>) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    let errors = predict(params, x) - y;
    errors.dot(&errors) / (2.0 * x.len() as f64)
}

/// Partial derivatives of [`cost`] with respect to `(θ0, θ1)`
pub fn gradients(params: Parameters, x: &Array1<f64>, y: &Array1<f64>) -> (f64, f64) {
    debug_assert_eq!(x.len(), y.len());
    let m = x.len() as f64;
    let errors = predict(params, x) - y;
    (errors.sum() / m, errors.dot(x) / m)
}

/// Evaluate the hypothesis over a feature sequence
pub fn predict(params: Parameters, x: &Array1<f64>) -> Array1<f64> {
    x * params.theta1 + params.theta0
}
