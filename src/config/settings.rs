//! # Configuration Settings
//!
//! Settings for running the toolkit against an account server, loaded from
//! built-in defaults, an optional TOML file and `OA_TEST_*` environment
//! variables (later sources win).

use crate::errors::{Error, Result};
use crate::signing::{SigningConfig, DEFAULT_HEADER_PREFIX, DEFAULT_SIGNED_HEADERS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use validator::Validate;

/// Prefix of environment variables read by [`Settings::load`]
pub const ENV_PREFIX: &str = "OA_TEST";

/// Default account server address
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:2021";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Toolkit settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Settings {
    /// Base URL that relative request paths are joined to
    #[validate(length(min = 1, message = "Server URL cannot be empty"))]
    pub server: String,

    /// Request timeout in seconds
    #[validate(range(
        min = 1,
        max = 3600,
        message = "Timeout must be between 1 and 3600 seconds"
    ))]
    pub timeout_secs: u64,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: Option<String>,

    /// Emit JSON log lines
    pub log_json: bool,

    /// Prefix of custom headers (signed, and used for `Sign` / `AppID`)
    #[validate(length(min = 1, message = "Header prefix cannot be empty"))]
    pub header_prefix: String,

    /// Standard headers that are always signed
    pub signed_headers: Vec<String>,

    /// Application id sent in `<prefix>AppID`
    pub app_id: Option<String>,

    /// Application key used to sign requests
    pub app_key: Option<String>,

    /// Add an explicit `Host` header to signed requests so it is part of
    /// the signature. Turn off for servers that sign without `host`, such as
    /// Go `net/http` services, which drop `Host` from the header map.
    pub sign_host: bool,

    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_level: None,
            log_json: false,
            header_prefix: DEFAULT_HEADER_PREFIX.to_string(),
            signed_headers: DEFAULT_SIGNED_HEADERS.iter().map(|h| h.to_string()).collect(),
            app_id: None,
            app_key: None,
            sign_host: true,
            accept_invalid_certs: false,
        }
    }
}

impl Settings {
    /// Load settings from an optional file and the environment, then validate
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("signed_headers"),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the environment only
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)?;
        self.validate_custom()
    }

    fn validate_custom(&self) -> Result<()> {
        let url = url::Url::parse(&self.server).map_err(|e| {
            Error::validation_field(
                format!("Invalid server URL '{}': {}", self.server, e),
                "server",
            )
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::validation_field(
                "Server URL must start with 'http://' or 'https://'",
                "server",
            ));
        }

        if self.app_id.is_some() != self.app_key.is_some() {
            return Err(Error::validation(
                "app_id and app_key must be configured together",
            ));
        }

        Ok(())
    }

    /// Request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Header signing rules derived from these settings
    pub fn signing_config(&self) -> SigningConfig {
        SigningConfig::new(&self.header_prefix, &self.signed_headers)
    }

    /// `(app_id, app_key)` when both are configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.app_id.as_deref(), self.app_key.as_deref()) {
            (Some(id), Some(key)) => Some((id, key)),
            _ => None,
        }
    }
}
