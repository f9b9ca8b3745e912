//! # Structured Logging
//!
//! Subscriber setup plus span macros for tracing requests sent to the
//! account server.

use crate::config::Settings;
use tracing_subscriber::{fmt, EnvFilter};

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Emit one JSON object per line instead of human-readable text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

impl LoggingConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            level: settings.log_level.clone().unwrap_or_else(|| "info".to_string()),
            json: settings.log_json,
        }
    }

    /// Force `debug` when verbose output was requested
    pub fn verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.level = "debug".to_string();
        }
        self
    }

    /// `RUST_LOG` wins over the configured level
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed (integration
/// tests, embedding applications); that is not an error.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let builder = fmt().with_env_filter(config.env_filter()).with_target(false);
    let result = if config.json {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.try_init()
    };
    result.is_ok()
}

/// Create a tracing span for one API request.
///
/// ```rust,ignore
/// let span = request_span!("POST", "/v1/account/user/login");
/// let span = request_span!("GET", "/v1/user/info", app_id = "app-1");
/// ```
#[macro_export]
macro_rules! request_span {
    ($method:expr, $path:expr) => {
        tracing::info_span!(
            "http_request",
            method = %$method,
            path = %$path,
            request_id = %uuid::Uuid::new_v4()
        )
    };
    ($method:expr, $path:expr, $($field:tt)*) => {
        tracing::info_span!(
            "http_request",
            method = %$method,
            path = %$path,
            request_id = %uuid::Uuid::new_v4(),
            $($field)*
        )
    };
}

/// Create a tracing span for a signing operation
#[macro_export]
macro_rules! signing_span {
    ($path:expr) => {
        tracing::debug_span!("sign_request", path = %$path)
    };
    ($path:expr, $($field:tt)*) => {
        tracing::debug_span!("sign_request", path = %$path, $($field)*)
    };
}

/// Log settings at startup. The app key is never logged.
pub fn log_settings(settings: &Settings) {
    tracing::info!(
        server = %settings.server,
        timeout_secs = settings.timeout_secs,
        header_prefix = %settings.header_prefix,
        signed_headers = ?settings.signed_headers,
        app_id = ?settings.app_id,
        signing_enabled = settings.credentials().is_some(),
        sign_host = settings.sign_host,
        "Account test toolkit configuration"
    );
}
