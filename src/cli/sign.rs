//! `sign` command: compute a request signature offline

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::output::{parse_header, parse_key_value, print_json};
use crate::config::Settings;
use crate::signing::{split_url, HeaderSet, RequestSigner};

#[derive(Args, Debug)]
pub struct SignArgs {
    /// Request path or URL; a query string is signed as arguments
    #[arg(long)]
    pub uri: String,

    /// Query argument; repeat a name to send a list
    #[arg(long = "arg", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub args: Vec<(String, String)>,

    /// Request header
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Request body
    #[arg(long, conflicts_with = "body_file")]
    pub body: Option<String>,

    /// Read the request body from a file
    #[arg(long)]
    pub body_file: Option<PathBuf>,

    /// Application key; defaults to the configured key
    #[arg(long)]
    pub app_key: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SignOutput {
    signature: String,
    signature_header: String,
    signing_string: String,
}

impl SignArgs {
    fn body_bytes(&self) -> Result<Vec<u8>> {
        if let Some(path) = &self.body_file {
            return std::fs::read(path)
                .with_context(|| format!("Failed to read body file: {}", path.display()));
        }
        Ok(self.body.clone().unwrap_or_default().into_bytes())
    }
}

fn sign(args: &SignArgs, settings: &Settings) -> Result<SignOutput> {
    let signer = RequestSigner::new(settings.signing_config());

    let (path, mut query) = split_url(&args.uri)?;
    for (name, value) in &args.args {
        query.append(name.clone(), value.clone());
    }
    let headers: HeaderSet = args.headers.iter().cloned().collect();
    let body = args.body_bytes()?;
    let app_key = args.app_key.as_deref().or(settings.app_key.as_deref());

    let signed = signer.sign(&path, &query, &headers, &body, app_key);
    Ok(SignOutput {
        signature: signed.signature,
        signature_header: signer.config().signature_header(),
        signing_string: signed.signing_string,
    })
}

pub fn handle_sign_command(args: SignArgs, settings: &Settings) -> Result<()> {
    let output = sign(&args, settings)?;
    if args.json {
        print_json(&output)?;
    } else {
        println!("{}: {}", output.signature_header, output.signature);
        println!("signing string:\n{}", output.signing_string);
    }
    Ok(())
}
