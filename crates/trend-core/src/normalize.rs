//! Standard-score feature scaling

use crate::error::{RegressionError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Mean and population standard deviation of a raw feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normalization {
    pub mean: f64,
    pub std_dev: f64,
}

impl Normalization {
    /// Map a raw feature value into normalized space
    pub fn apply(&self, value: f64) -> f64 {
        (value - self.mean) / self.std_dev
    }
}

/// Feature vector `0, 1, ..., m-1` used as the time index of a price series
pub fn time_index(len: usize) -> Array1<f64> {
    Array1::from_iter((0..len).map(|i| i as f64))
}

/// Standard-score transform `x' = (x - mean) / std`
///
/// Uses the population standard deviation. Fails with
/// [`RegressionError::DegenerateInput`] for fewer than two values or a
/// feature with no spread, so callers never divide by zero.
pub fn normalize(values: &Array1<f64>) -> Result<(Array1<f64>, Normalization)> {
    if values.len() < 2 {
        return Err(RegressionError::DegenerateInput(format!(
            "need at least 2 samples to normalize, got {}",
            values.len()
        )));
    }

    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(RegressionError::NonFinite { index });
    }

    let mean = values.mean().unwrap_or(0.0);
    let std_dev = values.std(0.0);

    // Spread that is only rounding noise around the mean counts as none.
    if std_dev <= f64::EPSILON * mean.abs().max(f64::MIN_POSITIVE) {
        return Err(RegressionError::DegenerateInput(format!(
            "feature has zero variance (mean {mean})"
        )));
    }

    let params = Normalization { mean, std_dev };
    let normalized = (values - mean) / std_dev;

    Ok((normalized, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_normalized_has_zero_mean_unit_std() {
        for len in [2, 3, 10, 251] {
            let (normalized, params) = normalize(&time_index(len)).unwrap();
            let mean = normalized.mean().unwrap();
            let std = normalized.std(0.0);
            assert!(mean.abs() < 1e-12, "len {len}: mean {mean}");
            assert!((std - 1.0).abs() < 1e-12, "len {len}: std {std}");
            assert!((params.mean - (len as f64 - 1.0) / 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_arbitrary_feature() {
        let (normalized, params) = normalize(&array![3.5, -2.0, 10.0, 7.25, 0.0]).unwrap();
        assert!(normalized.mean().unwrap().abs() < 1e-12);
        assert!((normalized.std(0.0) - 1.0).abs() < 1e-12);
        assert!((params.apply(10.0) - normalized[2]).abs() < 1e-12);
    }

    #[test]
    fn test_single_sample_is_degenerate() {
        let err = normalize(&array![0.0]).unwrap_err();
        assert!(matches!(err, RegressionError::DegenerateInput(_)));

        let err = normalize(&Array1::zeros(0)).unwrap_err();
        assert!(matches!(err, RegressionError::DegenerateInput(_)));
    }

    #[test]
    fn test_constant_feature_is_degenerate() {
        assert!(matches!(
            normalize(&array![5.0, 5.0, 5.0]),
            Err(RegressionError::DegenerateInput(_))
        ));
        assert!(matches!(
            normalize(&array![0.1, 0.1, 0.1]),
            Err(RegressionError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(
            normalize(&array![1.0, f64::NAN, 3.0]).unwrap_err(),
            RegressionError::NonFinite { index: 1 }
        );
    }

    #[test]
    fn test_apply() {
        let params = Normalization { mean: 4.5, std_dev: 2.0 };
        assert!((params.apply(8.5) - 2.0).abs() < 1e-12);
    }
}
