//! Yahoo Finance price history client

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::source::{PricePoint, PriceSeries, PriceSource};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, warn};
use yahoo_finance_api as yahoo;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Yahoo Finance API client
pub struct YahooFinanceClient {
    connector: yahoo::YahooConnector,
    rate_limiter: SharedRateLimiter,
    config: Arc<AnalysisConfig>,
}

/// Start of the lookback window `range` ending at `end`
///
/// Supports the Yahoo style ranges `1d 5d 1mo 3mo 6mo 1y 2y 5y 10y ytd max`.
pub fn lookback_start(range: &str, end: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let days = match range {
        "1d" => 1,
        "5d" => 5,
        "1mo" => 30,
        "3mo" => 90,
        "6mo" => 180,
        "1y" => 365,
        "2y" => 730,
        "5y" => 1825,
        "10y" => 3650,
        "max" => 36500, // ~100 years
        "ytd" => {
            return NaiveDate::from_ymd_opt(end.year(), 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|d| d.and_utc())
                .ok_or_else(|| AnalysisError::InvalidRange(range.to_string()));
        }
        _ => return Err(AnalysisError::InvalidRange(range.to_string())),
    };

    Ok(end - chrono::Duration::days(days))
}

/// Markers Yahoo uses for a symbol or window with no quotes
///
/// Matched against the debug rendering of the connector error, which names the
/// variant (`NoQuotes`, `NoResult`, `EmptyDataSet`) or carries the HTTP status
/// and API message of a chart lookup that found nothing.
const MISSING_DATA_MARKERS: [&str; 6] = [
    "NoQuotes",
    "NoResult",
    "EmptyDataSet",
    "404",
    "Not Found",
    "No data found",
];

/// Whether a connector error means "nothing to fetch" rather than a transport failure
fn reports_missing_data(error: &str) -> bool {
    MISSING_DATA_MARKERS.iter().any(|marker| error.contains(marker))
}

/// Keep `(unix timestamp, close)` pairs with a finite, positive close
fn clean_quotes(raw: impl IntoIterator<Item = (i64, f64)>) -> Vec<PricePoint> {
    raw.into_iter()
        .filter(|&(_, close)| close.is_finite() && close > 0.0)
        .filter_map(|(timestamp, close)| {
            DateTime::from_timestamp(timestamp, 0).map(|timestamp| PricePoint { timestamp, close })
        })
        .collect()
}

/// Time-ordered series, or `DataUnavailable` when nothing usable is left
fn into_series(symbol: &str, range: &str, points: Vec<PricePoint>) -> Result<PriceSeries> {
    if points.is_empty() {
        return Err(AnalysisError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: format!("no price history for range {range}"),
        });
    }

    Ok(PriceSeries::new(symbol, points))
}

impl YahooFinanceClient {
    /// Create a client using the retry and rate settings of `config`
    pub fn new(config: Arc<AnalysisConfig>) -> Result<Self> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| AnalysisError::YahooFinanceError(e.to_string()))?;

        let per_minute = NonZeroU32::new(config.requests_per_minute).ok_or_else(|| {
            AnalysisError::ConfigError("requests_per_minute must be greater than 0".to_string())
        })?;

        Ok(Self {
            connector,
            rate_limiter: Arc::new(RateLimiter::direct(Quota::per_minute(per_minute))),
            config,
        })
    }

    /// Get daily closes for a symbol between two instants
    pub async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>> {
        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| AnalysisError::YahooFinanceError(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| AnalysisError::YahooFinanceError(format!("Invalid end timestamp: {e}")))?;

        let mut attempt = 0;
        let quotes = loop {
            self.rate_limiter.until_ready().await;

            let outcome = match self
                .connector
                .get_quote_history(symbol, start_odt, end_odt)
                .await
            {
                Ok(response) => response.quotes(),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(quotes) => break quotes,
                Err(e) if reports_missing_data(&format!("{e:?}")) => {
                    debug!(symbol, error = %e, "no price history, not retrying");
                    return Err(AnalysisError::DataUnavailable {
                        symbol: symbol.to_string(),
                        reason: e.to_string(),
                    });
                }
                Err(e) if attempt + 1 < self.config.max_retries => {
                    let backoff = self.config.retry_backoff(attempt);
                    warn!(symbol, attempt, ?backoff, error = %e, "price history request failed, retrying");
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(AnalysisError::YahooFinanceError(e.to_string())),
            }
        };

        let total = quotes.len();
        let points = clean_quotes(quotes.iter().map(|q| (q.timestamp as i64, q.close)));

        if points.len() < total {
            warn!(symbol, dropped = total - points.len(), "dropped unusable quotes");
        }
        debug!(symbol, points = points.len(), "fetched price history");

        Ok(points)
    }

    /// Get daily closes with a specific range
    pub async fn get_historical_range(
        &self,
        symbol: &str,
        range: &str, // e.g., "1mo", "3mo", "1y"
    ) -> Result<Vec<PricePoint>> {
        let end = Utc::now();
        let start = lookback_start(range, end)?;
        self.get_historical_quotes(symbol, start, end).await
    }
}

#[async_trait]
impl PriceSource for YahooFinanceClient {
    async fn fetch_closes(&self, symbol: &str, range: &str) -> Result<PriceSeries> {
        let points = self.get_historical_range(symbol, range).await?;
        into_series(symbol, range, points)
    }

    fn name(&self) -> &'static str {
        "yahoo"
    }
}
