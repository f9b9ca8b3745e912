//! `request` command: send one request to the account server and check it

use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;
use reqwest::Method;

use super::output::{parse_header, parse_key_value, read_json};
use crate::client::{ApiClient, ApiRequest};
use crate::config::Settings;

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: Method,

    /// Path (joined to the server address) or absolute URL
    pub url: String,

    /// Query argument
    #[arg(long = "arg", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub args: Vec<(String, String)>,

    /// Request header
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// JSON body
    #[arg(long)]
    pub json: Option<String>,

    /// Expected status
    #[arg(long, default_value_t = 200)]
    pub status: u16,

    /// Regex the response must match
    #[arg(long = "match")]
    pub matches: Vec<String>,

    /// Schema file the response must satisfy
    #[arg(long)]
    pub schema: Option<std::path::PathBuf>,

    /// Print the inferred response schema at this depth
    #[arg(long, num_args = 0..=1, default_missing_value = "4")]
    pub show_schema: Option<usize>,
}

fn build_request(args: &RequestArgs) -> Result<ApiRequest> {
    let mut request = ApiRequest::new(args.method.clone(), args.url.clone()).status(args.status);
    for (name, value) in &args.args {
        request.args.append(name.clone(), value.clone());
    }
    for (name, value) in &args.headers {
        request = request.header(name, value.clone());
    }
    if let Some(body) = &args.json {
        request = request.json(serde_json::from_str(body)?);
    }
    for pattern in &args.matches {
        request = request.matches(pattern.clone());
    }
    if let Some(path) = &args.schema {
        request = request.schema(read_json(Some(path))?);
    }
    if let Some(depth) = args.show_schema {
        request = request.show_schema(depth);
    }
    Ok(request)
}

pub async fn handle_request_command(args: RequestArgs, settings: &Settings) -> Result<()> {
    let client = ApiClient::new(settings)?;
    let request = build_request(&args)?;
    let response = client.execute(request).await?;

    println!("{} {}", response.status.to_string().green(), response.url);
    println!("{}", response.text());
    println!("{}", client.stats().snapshot());
    Ok(())
}
