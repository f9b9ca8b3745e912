//! `schema` command: infer a JSON schema from an example document

use anyhow::Result;
use clap::Args;
use serde_json::Value;
use std::path::PathBuf;

use super::output::{parse_key_value, read_input};
use crate::schema::{EnumMode, InferenceOptions, SchemaInferencer, DEFAULT_DEPTH_LIMIT};

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// JSON document (reads stdin when omitted or `-`)
    pub file: Option<PathBuf>,

    /// Deepest level that is expanded
    #[arg(short, long, default_value_t = DEFAULT_DEPTH_LIMIT)]
    pub depth: usize,

    /// Pin every scalar to its observed value
    #[arg(long, conflicts_with = "force_enum")]
    pub enum_all: bool,

    /// Pin scalars with this field name to their observed value
    #[arg(long = "force-enum", value_name = "FIELD")]
    pub force_enum: Vec<String>,

    /// Pin a top-level property to a literal after inference (JSON value)
    #[arg(long = "pin", value_name = "FIELD=JSON", value_parser = parse_key_value)]
    pub pins: Vec<(String, String)>,
}

impl SchemaArgs {
    fn options(&self) -> InferenceOptions {
        let mode = if self.enum_all {
            EnumMode::AllScalars
        } else if !self.force_enum.is_empty() {
            EnumMode::fields(self.force_enum.iter().cloned())
        } else {
            EnumMode::Off
        };
        InferenceOptions::with_depth(self.depth).enum_mode(mode)
    }
}

/// Parse pin values as JSON, falling back to a plain string
fn pin_values(pins: &[(String, String)]) -> Vec<(String, Value)> {
    pins.iter()
        .map(|(field, raw)| {
            let value =
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
            (field.clone(), value)
        })
        .collect()
}

pub fn handle_schema_command(args: SchemaArgs) -> Result<()> {
    let input = read_input(args.file.as_deref())?;
    let inferencer = SchemaInferencer::with_options(args.options());
    let mut schema = inferencer.infer_from_json(&input)?;

    let pins = pin_values(&args.pins);
    schema.apply_enum_overrides(pins.iter().map(|(k, v)| (k.as_str(), v)));

    println!("{}", schema.to_pretty_string()?);
    Ok(())
}
