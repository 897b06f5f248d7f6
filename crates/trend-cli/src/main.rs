//! Stock trend analysis CLI
//!
//! Fits a linear trend to each symbol's daily closes and prints a report.
//!
//! # Usage
//!
//! ```bash
//! # Analyse the default symbols over one year
//! cargo run --bin stock-trend
//!
//! # Pick symbols and export chart data
//! TREND_SYMBOLS="VALE3.SA,ITUB4.SA" cargo run --bin stock-trend -- --range 6mo --chart-dir charts
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use trend_core::TrainingConfig;
use trend_core::config::{DEFAULT_LEARNING_RATE, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use trend_stock::interface::ChartData;
use trend_stock::{
    AnalysisConfig, FormatterFactory, OutputFormat, TrendAnalyzer, YahooFinanceClient,
    parse_symbols,
};

#[derive(Parser, Debug)]
#[command(name = "stock-trend")]
#[command(about = "Linear price trends fitted by gradient descent", long_about = None)]
struct Args {
    /// Comma-separated ticker symbols; overrides TREND_SYMBOLS
    #[arg(short, long)]
    symbols: Option<String>,

    /// Lookback window (1d 5d 1mo 3mo 6mo 1y 2y 5y 10y ytd max)
    #[arg(short, long, default_value = "1y")]
    range: String,

    #[arg(long, default_value_t = DEFAULT_LEARNING_RATE)]
    learning_rate: f64,

    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// Stop once the cost changes by less than this between iterations
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Write chart data for each analysed symbol into this directory
    #[arg(long)]
    chart_dir: Option<PathBuf>,
}

impl Args {
    fn analysis_config(&self) -> trend_stock::Result<AnalysisConfig> {
        let training = TrainingConfig::default()
            .with_learning_rate(self.learning_rate)
            .with_max_iterations(self.max_iterations)
            .with_tolerance(self.tolerance);

        let builder = AnalysisConfig::builder()
            .with_env_symbols()
            .range(self.range.clone())
            .training(training);

        match &self.symbols {
            Some(raw) => builder.symbols(parse_symbols(raw)).build(),
            None => builder.build(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    trend_utils::init_tracing_with_default("warn,trend_stock=info,stock_trend=info");

    let args = Args::parse();
    let config = Arc::new(args.analysis_config()?);

    info!(
        symbols = ?config.symbols,
        range = %config.range,
        learning_rate = config.training.learning_rate,
        "starting trend analysis"
    );

    let source = Arc::new(YahooFinanceClient::new(config.clone())?);
    let analyzer = TrendAnalyzer::new(source, config)?;
    let batch = analyzer.analyze_all().await;

    let formatter = FormatterFactory::create(args.format);
    println!("{}", formatter.format_batch(&batch)?);

    if let Some(dir) = &args.chart_dir {
        for report in batch.reports() {
            if let Err(e) = ChartData::from_report(report).write_json(dir) {
                warn!(symbol = %report.symbol, error = %e, "could not write chart data");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "stock-trend",
            "--symbols",
            "vale3.sa, itub4.sa",
            "--range",
            "6mo",
            "--learning-rate",
            "0.05",
            "--max-iterations",
            "500",
            "--format",
            "json",
        ]);
        let config = args.analysis_config().unwrap();

        assert_eq!(config.symbols, vec!["VALE3.SA", "ITUB4.SA"]);
        assert_eq!(config.range, "6mo");
        assert!((config.training.learning_rate - 0.05).abs() < f64::EPSILON);
        assert_eq!(config.training.max_iterations, 500);
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.chart_dir.is_none());
    }

    #[test]
    fn test_invalid_flags_are_rejected() {
        let args = Args::parse_from(["stock-trend", "--symbols", "A", "--range", "7w"]);
        assert!(args.analysis_config().is_err());

        let args = Args::parse_from(["stock-trend", "--symbols", "A", "--learning-rate", "0"]);
        assert!(args.analysis_config().is_err());
    }

    #[test]
    fn test_unknown_format() {
        assert!(Args::try_parse_from(["stock-trend", "--format", "yaml"]).is_err());
    }
}
