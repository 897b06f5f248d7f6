//! API clients for price history providers

pub mod yahoo;

pub use yahoo::{YahooFinanceClient, lookback_start};
