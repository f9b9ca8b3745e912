//! `validate` command: check a JSON document against a schema

use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;
use std::path::PathBuf;

use super::output::read_json;
use crate::schema::SchemaValidator;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema file
    #[arg(long)]
    pub schema: PathBuf,

    /// JSON document to validate (reads stdin when omitted or `-`)
    pub instance: Option<PathBuf>,
}

pub fn handle_validate_command(args: ValidateArgs) -> Result<()> {
    let schema = read_json(Some(&args.schema))?;
    let instance = read_json(args.instance.as_deref())?;
    let validator = SchemaValidator::compile(&schema)?;

    match validator.validate(&instance) {
        Ok(()) => {
            println!("{}", "✅ Document is valid".green());
            Ok(())
        }
        Err(violations) => {
            println!("{}", "❌ Document is invalid:".red());
            for violation in &violations {
                println!("  {violation}");
            }
            anyhow::bail!("{} schema violation(s)", violations.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_json(value: &serde_json::Value) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), value.to_string()).unwrap();
        file
    }

    #[test]
    fn test_validate_files() {
        let schema = write_json(&crate::schema::ok_object_schema());
        let good = write_json(&serde_json::json!({"ok": true, "reason": "", "data": {}}));
        let bad = write_json(&serde_json::json!({"ok": false, "reason": "ERR"}));

        let result = handle_validate_command(ValidateArgs {
            schema: schema.path().to_path_buf(),
            instance: Some(good.path().to_path_buf()),
        });
        assert!(result.is_ok());

        let result = handle_validate_command(ValidateArgs {
            schema: schema.path().to_path_buf(),
            instance: Some(bad.path().to_path_buf()),
        });
        assert!(result.is_err());
    }
}
