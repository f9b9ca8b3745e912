//! # Observability
//!
//! Structured logging through `tracing`. Nothing here exports metrics or
//! traces to external collectors.

pub mod logging;

pub use logging::{init_logging, log_settings, LoggingConfig};
