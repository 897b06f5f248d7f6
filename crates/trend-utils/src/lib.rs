//! Shared utilities for the stock trend workspace

pub mod logging;

pub use logging::{DEFAULT_DIRECTIVE, init_tracing, init_tracing_with_default};
