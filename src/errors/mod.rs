//! # Error Handling
//!
//! Crate-wide error type for the account test toolkit, defined with `thiserror`.
//!
//! Response-shape mismatches and signature failures have their own error types
//! ([`crate::client::CheckFailure`], [`crate::signing::SignatureError`]) because
//! callers inspect their details. A failed check still converts into [`Error`]
//! so a whole request can be driven with `?`.

/// Custom result type for toolkit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the account test toolkit
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Caller-supplied input that violates a documented contract
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },

    /// A JSON schema document that cannot be compiled
    #[error("Schema error: {0}")]
    Schema(String),

    /// HTTP transport errors (connect, timeout, body read)
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },

    /// Response did not meet its expectation
    #[error(transparent)]
    Check(#[from] crate::client::CheckFailure),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    /// Create a schema compilation error
    pub fn schema<S: Into<String>>(message: S) -> Self {
        Self::Schema(message.into())
    }

    /// Create a transport error without an underlying client error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport { message: message.into(), source: None }
    }

    /// Wrap a serde_json error with context
    pub fn serialization<S: Into<String>>(source: serde_json::Error, context: S) -> Self {
        Self::Serialization { source, context: context.into() }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::config_with_source("Failed to load settings", Box::new(err))
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        let field = err.field_errors().keys().next().map(|k| k.to_string());
        Self::Validation { message: err.to_string(), field }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "connection failed".to_string()
        } else {
            err.to_string()
        };
        Self::Transport { message, source: Some(err) }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err, "JSON processing failed")
    }
}
