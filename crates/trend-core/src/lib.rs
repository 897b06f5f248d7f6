//! Linear trend fitting by manual batch gradient descent
//!
//! This crate fits `price = θ0 + θ1·day` to a single price series:
//!
//! - [`normalize`]: standard-score scaling of the day index
//! - [`cost`] / [`gradients`]: halved MSE and its partial derivatives
//! - [`train`]: bounded gradient descent with a tolerance-based stop
//! - [`predict`] / [`evaluate`]: fitted values, R² and MSE
//!
//! [`TrendModel`] strings these together for one series and returns a
//! [`FittedTrend`] with de-normalized coefficients and metrics in price units.
//!
//! # Example
//!
//! ```rust
//! use trend_core::{TrainingConfig, TrendModel};
//!
//! let prices = [10.0, 12.0, 14.0, 16.0];
//! let fitted = TrendModel::new(TrainingConfig::default())?.fit(&prices)?;
//!
//! assert!(fitted.coefficients().slope > 0.0);
//! assert!(fitted.metrics().r2 > 0.99);
//! # Ok::<(), trend_core::RegressionError>(())
//! ```

pub mod config;
pub mod error;
pub mod gradient;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod train;

pub use config::TrainingConfig;
pub use error::{RegressionError, Result};
pub use gradient::{Parameters, cost, gradients, predict};
pub use metrics::{FitMetrics, evaluate, residuals};
pub use model::{Coefficients, FittedTrend, Trend, TrendModel};
pub use normalize::{Normalization, normalize, time_index};
pub use train::{TrainingOutcome, train};
