//! Error types for the regression engine

use thiserror::Error;

/// Result type alias for regression operations
pub type Result<T> = std::result::Result<T, RegressionError>;

/// Errors raised while fitting or evaluating a trend line
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegressionError {
    /// Too few samples, or a feature with no spread, so it cannot be normalized
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// R² is undefined because the target has no measurable variance
    #[error("Undefined metric: {0}")]
    UndefinedMetric(String),

    /// Feature and target sequences have different lengths
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// NaN or infinity found in the input
    #[error("Non-finite value at index {index}")]
    NonFinite { index: usize },

    /// Cost stopped being finite during training
    #[error("Training diverged at iteration {iteration} (learning rate {learning_rate})")]
    Diverged { iteration: usize, learning_rate: f64 },

    /// Invalid hyperparameters
    #[error("Invalid training configuration: {0}")]
    InvalidConfig(String),
}
