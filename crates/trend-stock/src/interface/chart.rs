//! Chart data export
//!
//! Prepares the series behind the two standard charts of a trend report:
//! actual vs fitted price, and the distribution of residuals. Rendering is
//! left to whatever consumes the JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::engine::TrendReport;
use crate::error::Result;

/// Bins used for the residual histogram
pub const RESIDUAL_BINS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Bucket `values` into `bins` equal-width bins spanning their range
    ///
    /// The last bin is closed on both ends. When every value is the same the
    /// range is widened to `value ± 0.5`. Returns `None` for no values or no
    /// bins.
    pub fn from_values(values: &[f64], bins: usize) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return None;
        }

        let (mut lo, mut hi) = finite
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if hi - lo <= 0.0 {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let mut counts = vec![0_usize; bins];
        for v in finite {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: lo + width * i as f64,
                upper: lo + width * (i + 1) as f64,
                count,
            })
            .collect();

        Some(Self { bins })
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Everything needed to draw the charts for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub symbol: String,
    pub range: String,
    pub data_points: usize,
    pub r2: f64,
    pub slope: f64,
    pub intercept: f64,
    pub actual: Vec<ChartPoint>,
    pub fitted: Vec<ChartPoint>,
    pub residual_histogram: Option<Histogram>,
}

impl ChartData {
    pub fn from_report(report: &TrendReport) -> Self {
        let actual = report
            .series
            .points
            .iter()
            .map(|p| ChartPoint {
                timestamp: p.timestamp,
                value: p.close,
            })
            .collect();

        let fitted = report
            .series
            .points
            .iter()
            .zip(&report.predictions)
            .map(|(p, &value)| ChartPoint {
                timestamp: p.timestamp,
                value,
            })
            .collect();

        Self {
            symbol: report.symbol.clone(),
            range: report.range.clone(),
            data_points: report.series.len(),
            r2: report.metrics.r2,
            slope: report.coefficients.slope,
            intercept: report.coefficients.intercept,
            actual,
            fitted,
            residual_histogram: Histogram::from_values(&report.residuals, RESIDUAL_BINS),
        }
    }

    /// `analysis_<symbol>.json` with dots in the symbol replaced by underscores
    pub fn file_name(&self) -> String {
        format!("analysis_{}.json", self.symbol.replace('.', "_"))
    }

    /// Write the chart data as pretty JSON into `dir`
    pub fn write_json(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        info!(symbol = %self.symbol, path = %path.display(), "chart data written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_counts_every_value() {
        let values = [-1.0, -0.5, 0.0, 0.1, 0.2, 0.9, 1.0];
        let hist = Histogram::from_values(&values, 4).unwrap();

        assert_eq!(hist.bins.len(), 4);
        assert_eq!(hist.total(), values.len());
        assert!((hist.bins[0].lower + 1.0).abs() < 1e-12);
        assert!((hist.bins[3].upper - 1.0).abs() < 1e-12);
        // max lands in the last, closed bin
        assert_eq!(hist.bins[3].count, 2);
    }

    #[test]
    fn test_histogram_constant_values() {
        let hist = Histogram::from_values(&[2.0, 2.0, 2.0], 20).unwrap();
        assert_eq!(hist.total(), 3);
        assert!((hist.bins[0].lower - 1.5).abs() < 1e-12);
        assert!((hist.bins[19].upper - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_chart_from_report() {
        let report = crate::test_support::sample_report();
        let chart = ChartData::from_report(&report);

        assert_eq!(chart.data_points, 6);
        assert_eq!(chart.actual.len(), 6);
        assert_eq!(chart.fitted.len(), 6);
        assert_eq!(chart.actual[2].timestamp, chart.fitted[2].timestamp);
        assert_eq!(chart.residual_histogram.as_ref().unwrap().total(), 6);
        assert_eq!(chart.file_name(), "analysis_UP_SA.json");
    }

    #[test]
    fn test_write_json() {
        let chart = ChartData::from_report(&crate::test_support::sample_report());
        let dir = std::env::temp_dir().join(format!("trend-chart-{}", std::process::id()));

        let path = chart.write_json(&dir).unwrap();
        let restored: ChartData =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(restored.symbol, "UP.SA");
        assert_eq!(restored.actual.len(), 6);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_histogram_empty() {
        assert!(Histogram::from_values(&[], 20).is_none());
        assert!(Histogram::from_values(&[1.0], 0).is_none());
    }
}
