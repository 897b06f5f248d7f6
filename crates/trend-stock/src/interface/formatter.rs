//! Report formatting

use comfy_table::{Table, presets::UTF8_FULL};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Write as _;
use std::str::FromStr;

use crate::engine::{BatchReport, TrendReport};
use crate::error::{AnalysisError, Result};

/// Output formats supported by [`FormatterFactory`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(AnalysisError::ConfigError(format!(
                "unknown output format '{other}', expected text or json"
            ))),
        }
    }
}

pub trait Formatter: Send + Sync {
    fn format(&self) -> OutputFormat;
    fn format_report(&self, report: &TrendReport) -> Result<String>;
    fn format_failure(&self, symbol: &str, error: &AnalysisError) -> String;
    fn format_batch(&self, batch: &BatchReport) -> Result<String>;
}

/// Human readable tables, one block per symbol
pub struct TextFormatter;

impl TextFormatter {
    fn forecast_label(offset: u32) -> String {
        if offset == 0 {
            "Next trading day".to_string()
        } else {
            format!("In {offset} days")
        }
    }

    fn table(header: &str, rows: Vec<(String, String)>) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec![header, "Value"]);
        for (label, value) in rows {
            table.add_row(vec![label, value]);
        }
        table
    }
}

impl Formatter for TextFormatter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Text
    }

    fn format_report(&self, report: &TrendReport) -> Result<String> {
        let stats = &report.stats;
        let coefficients = &report.coefficients;
        let metrics = &report.metrics;

        let mut output = String::new();
        let rule = "=".repeat(50);
        writeln!(output, "{rule}\nTREND ANALYSIS: {}\n{rule}", report.symbol).ok();

        let period = match (report.series.first_timestamp(), report.series.last_timestamp()) {
            (Some(first), Some(last)) => {
                format!("{} to {}", first.format("%Y-%m-%d"), last.format("%Y-%m-%d"))
            }
            _ => "-".to_string(),
        };

        let descriptive = Self::table(
            "Descriptive statistics",
            vec![
                ("Period".into(), period),
                ("Minimum price".into(), format!("{:.2}", stats.min)),
                ("Maximum price".into(), format!("{:.2}", stats.max)),
                ("Price range".into(), format!("{:.2}", stats.range())),
                ("Mean price".into(), format!("{:.2}", stats.mean)),
                ("Std deviation (volatility)".into(), format!("{:.2}", stats.std_dev)),
                ("Days analysed".into(), stats.count.to_string()),
            ],
        );
        writeln!(output, "{descriptive}").ok();

        let regression = Self::table(
            "Linear regression",
            vec![
                ("Intercept (β₀)".into(), format!("{:.4}", coefficients.intercept)),
                ("Slope (β₁)".into(), format!("{:.6} per day", coefficients.slope)),
                ("Trend".into(), report.trend.to_string().to_uppercase()),
                ("Mean squared error".into(), format!("{:.4}", metrics.mse)),
                ("R²".into(), format!("{:.4}", metrics.r2)),
                (
                    "Gradient descent".into(),
                    format!(
                        "{} iterations, {}",
                        report.training.iterations,
                        if report.training.converged { "converged" } else { "hit iteration cap" }
                    ),
                ),
            ],
        );
        writeln!(output, "{regression}").ok();

        if !report.forecasts.is_empty() {
            let forecasts = Self::table(
                "Forecast",
                report
                    .forecasts
                    .iter()
                    .map(|f| (Self::forecast_label(f.offset), format!("{:.2}", f.price)))
                    .collect(),
            );
            writeln!(output, "{forecasts}").ok();
        }

        Ok(output)
    }

    fn format_failure(&self, symbol: &str, error: &AnalysisError) -> String {
        format!("✗ {symbol}: {error}")
    }

    fn format_batch(&self, batch: &BatchReport) -> Result<String> {
        let mut output = String::new();
        for entry in &batch.entries {
            match &entry.outcome {
                Ok(report) => output.push_str(&self.format_report(report)?),
                Err(e) => {
                    output.push_str(&self.format_failure(&entry.symbol, e));
                    output.push('\n');
                }
            }
            output.push('\n');
        }

        writeln!(
            output,
            "{} of {} symbols analysed ({:.0}%)",
            batch.reports().count(),
            batch.entries.len(),
            batch.success_rate() * 100.0
        )
        .ok();

        Ok(output)
    }
}

/// Machine readable output
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn format_report(&self, report: &TrendReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    fn format_failure(&self, symbol: &str, error: &AnalysisError) -> String {
        json!({ "symbol": symbol, "kind": error.kind(), "error": error.to_string() }).to_string()
    }

    fn format_batch(&self, batch: &BatchReport) -> Result<String> {
        let reports: Vec<&TrendReport> = batch.reports().collect();
        let failures: Vec<_> = batch
            .failures()
            .map(|(symbol, e)| json!({ "symbol": symbol, "kind": e.kind(), "error": e.to_string() }))
            .collect();

        Ok(serde_json::to_string_pretty(&json!({
            "started_at": batch.started_at,
            "finished_at": batch.finished_at,
            "success_rate": batch.success_rate(),
            "reports": reports,
            "failures": failures,
        }))?)
    }
}

pub struct FormatterFactory;

impl FormatterFactory {
    pub fn create(format: OutputFormat) -> Box<dyn Formatter> {
        match format {
            OutputFormat::Text => Box::new(TextFormatter),
            OutputFormat::Json => Box::new(JsonFormatter),
        }
    }
}
