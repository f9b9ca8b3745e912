//! # Command Line Interface
//!
//! `account-testkit` commands for inferring schemas, signing requests offline,
//! validating documents and sending checked requests to an account server.

pub mod output;
pub mod request;
pub mod schema;
pub mod sign;
pub mod validate;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Settings;
use crate::observability::{init_logging, log_settings, LoggingConfig};

#[derive(Parser)]
#[command(name = "account-testkit")]
#[command(about = "Schema inference and request signing for account service tests")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (TOML); environment variables override it
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Server address override
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Infer a JSON schema from an example document
    Schema(schema::SchemaArgs),

    /// Compute a request signature
    Sign(sign::SignArgs),

    /// Validate a JSON document against a schema
    Validate(validate::ValidateArgs),

    /// Send a request and check the response
    Request(request::RequestArgs),
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(server) = cli.server {
        settings.server = server;
        settings.validate()?;
    }

    init_logging(&LoggingConfig::from_settings(&settings).verbose(cli.verbose));
    log_settings(&settings);

    match cli.command {
        Commands::Schema(args) => schema::handle_schema_command(args)?,
        Commands::Sign(args) => sign::handle_sign_command(args, &settings)?,
        Commands::Validate(args) => validate::handle_validate_command(args)?,
        Commands::Request(args) => request::handle_request_command(args, &settings).await?,
    }

    Ok(())
}
