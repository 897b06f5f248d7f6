//! Fit-quality metrics

use crate::error::{RegressionError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Goodness of fit of a set of predictions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitMetrics {
    /// Coefficient of determination `1 - SSres / SStot`
    pub r2: f64,
    /// Mean squared error
    pub mse: f64,
    /// Root mean squared error
    pub rmse: f64,
    /// Mean absolute error
    pub mae: f64,
}

/// `y_i - ŷ_i` for every sample
pub fn residuals(y: &Array1<f64>, y_hat: &Array1<f64>) -> Array1<f64> {
    y - y_hat
}

/// Compare targets against predictions
///
/// R² is undefined when the targets have no variance that survives floating
/// point rounding (`SStot <= ε·Σy²`, which includes identical prices); that
/// case is reported as [`RegressionError::UndefinedMetric`] instead of
/// producing NaN or a meaningless ratio.
pub fn evaluate(y: &Array1<f64>, y_hat: &Array1<f64>) -> Result<FitMetrics> {
    if y.len() != y_hat.len() {
        return Err(RegressionError::DimensionMismatch {
            expected: y.len(),
            got: y_hat.len(),
        });
    }
    if y.is_empty() {
        return Err(RegressionError::DegenerateInput(
            "cannot evaluate an empty series".to_string(),
        ));
    }
    if let Some(index) = y.iter().chain(y_hat).position(|v| !v.is_finite()) {
        return Err(RegressionError::NonFinite {
            index: index % y.len(),
        });
    }

    let m = y.len() as f64;
    let mean = y.mean().unwrap_or(0.0);

    let errors = residuals(y, y_hat);
    let ss_res = errors.dot(&errors);
    let centered = y - mean;
    let ss_tot = centered.dot(&centered);

    if ss_tot <= f64::EPSILON * y.dot(y) {
        return Err(RegressionError::UndefinedMetric(format!(
            "R² is undefined: target variance ({ss_tot:e}) is below floating-point \
             resolution for {} values around {mean}",
            y.len()
        )));
    }

    let mse = ss_res / m;
    Ok(FitMetrics {
        r2: 1.0 - ss_res / ss_tot,
        mse,
        rmse: mse.sqrt(),
        mae: errors.mapv(f64::abs).sum() / m,
    })
}
