//! # Account Testkit
//!
//! Test tooling for an account service's HTTP API:
//!
//! - **Schema inference**: derive a JSON schema from an example response,
//!   optionally pinning observed literals as `enum` values, then validate
//!   real responses against it.
//! - **Request signing**: canonicalise a request (path, query, selected
//!   headers, body hash) and sign it with SHA-1 and an application key,
//!   exactly as the service's signature middleware verifies it.
//! - **Test client**: send signed requests, time them, and check status,
//!   body patterns and schema in one call.
//!
//! ## Example Usage
//!
//! ```rust
//! use account_testkit::schema::{EnumMode, InferenceOptions, SchemaInferencer};
//! use account_testkit::signing::{HeaderSet, QueryArgs, RequestSigner};
//! use serde_json::json;
//!
//! let inferencer = SchemaInferencer::with_options(
//!     InferenceOptions::default().enum_mode(EnumMode::fields(["ok"])),
//! );
//! let schema = inferencer.infer(&json!({"ok": true, "data": {"id": 1}}));
//! assert_eq!(schema.to_json_schema().unwrap()["properties"]["ok"]["enum"], json!([true]));
//!
//! let signed = RequestSigner::default().sign(
//!     "/v1/user/info",
//!     &QueryArgs::new().with("id", "1"),
//!     &HeaderSet::new().with("Host", "api.example.com"),
//!     b"",
//!     Some("app-key"),
//! );
//! assert_eq!(signed.signature.len(), 40);
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod fixtures;
pub mod observability;
pub mod schema;
pub mod signing;

// Re-export commonly used types
pub use client::{ApiClient, ApiRequest, ApiResponse, CheckFailure};
pub use config::Settings;
pub use errors::{Error, Result};
pub use schema::{SchemaInferencer, SchemaNode};
pub use signing::{RequestSigner, SignatureVerifier};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
