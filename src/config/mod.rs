//! # Configuration Management
//!
//! Settings are read once at startup and passed down explicitly; nothing in
//! the crate reads configuration from global state afterwards.

pub mod settings;

pub use settings::{Settings, DEFAULT_SERVER, DEFAULT_TIMEOUT_SECS, ENV_PREFIX};
