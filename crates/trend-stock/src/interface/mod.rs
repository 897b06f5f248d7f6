//! Presentation of trend reports
//!
//! Text and JSON renderings for the terminal, plus chart data export

pub mod chart;
pub mod formatter;

pub use chart::{ChartData, ChartPoint, Histogram, HistogramBin, RESIDUAL_BINS};
pub use formatter::{Formatter, FormatterFactory, JsonFormatter, OutputFormat, TextFormatter};
