//! Descriptive statistics over raw close prices

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator), 0 for a single price
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Summarise `prices`; `None` when there are none
    pub fn from_prices(prices: &[f64]) -> Option<Self> {
        let (&first, rest) = prices.split_first()?;
        let count = prices.len();

        let (min, max, sum) = rest
            .iter()
            .fold((first, first, first), |(lo, hi, sum), &p| (lo.min(p), hi.max(p), sum + p));
        let mean = sum / count as f64;

        let std_dev = if count > 1 {
            let squares: f64 = prices.iter().map(|p| (p - mean).powi(2)).sum();
            (squares / (count - 1) as f64).sqrt()
        } else {
            0.0
        };

        Some(Self {
            count,
            min,
            max,
            mean,
            std_dev,
        })
    }

    /// Spread between the highest and lowest price
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}
