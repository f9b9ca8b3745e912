//! JSON schema validation of response bodies
//!
//! Uses the `jsonschema` crate with Draft 4, the dialect the inferred and
//! hand-written account schemas are written in.

use jsonschema::{Draft, Validator};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::errors::{Error, Result};

/// One failed schema keyword
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    /// JSON pointer to the offending instance value (e.g. "/data/tel")
    pub path: String,
    /// Human-readable error message
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{}: {}", path, self.message)
    }
}

/// Compiled schema
pub struct SchemaValidator {
    validator: Validator,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator").finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Compile a schema document
    pub fn compile(schema: &Value) -> Result<Self> {
        let validator = Validator::options()
            .with_draft(Draft::Draft4)
            .build(schema)
            .map_err(|e| Error::schema(e.to_string()))?;
        Ok(Self { validator })
    }

    /// Whether `instance` satisfies the schema
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    /// Every violation found in `instance`; empty when valid
    pub fn violations(&self, instance: &Value) -> Vec<SchemaViolation> {
        self.validator
            .iter_errors(instance)
            .map(|e| SchemaViolation { path: e.instance_path.to_string(), message: e.to_string() })
            .collect()
    }

    /// `Ok(())` when valid, otherwise all violations
    pub fn validate(&self, instance: &Value) -> std::result::Result<(), Vec<SchemaViolation>> {
        let violations = self.violations(instance);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Compile `schema` and validate `instance` in one step
pub fn validate(
    schema: &Value,
    instance: &Value,
) -> Result<std::result::Result<(), Vec<SchemaViolation>>> {
    Ok(SchemaValidator::compile(schema)?.validate(instance))
}
