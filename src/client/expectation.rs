//! Response expectations and the failures they report

use owo_colors::OwoColorize;
use regex::Regex;
use reqwest::Method;
use serde_json::Value;
use tracing::warn;

use super::response::ApiResponse;
use crate::errors::Result;
use crate::schema::{InferenceOptions, SchemaInferencer, SchemaValidator, SchemaViolation};
use crate::schema::DEBUG_DEPTH_LIMIT;

/// What a response must look like
#[derive(Debug, Clone, PartialEq)]
pub struct Expectation {
    pub status: u16,
    pub schema: Option<Value>,
    pub matches: Vec<String>,
    pub not_matches: Vec<String>,
    /// Print the inferred schema of the body at this depth before checking
    pub show_schema: Option<usize>,
}

impl Default for Expectation {
    fn default() -> Self {
        Self {
            status: 200,
            schema: None,
            matches: Vec::new(),
            not_matches: Vec::new(),
            show_schema: None,
        }
    }
}

/// A response that did not meet its [`Expectation`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CheckFailure {
    #[error("expect status ({expected}), but res.status ({actual}) [{req_debug}]")]
    Status { expected: u16, actual: u16, req_debug: String },

    #[error("response text not matched regex: {pattern} [{req_debug}]")]
    NotMatched { pattern: String, req_debug: String },

    #[error("response text matched regex: {pattern} [{req_debug}]")]
    Matched { pattern: String, req_debug: String },

    #[error("request [{req_debug}]'s response body is not JSON: {message}")]
    NotJson { message: String, req_debug: String },

    #[error(
        "request [{req_debug}]'s response body is invalid:\n{}",
        render_violations(.violations)
    )]
    Schema { violations: Vec<SchemaViolation>, req_debug: String },

    #[error("invalid expectation: {message}")]
    InvalidExpectation { message: String },
}

fn render_violations(violations: &[SchemaViolation]) -> String {
    violations.iter().map(|v| format!("  {v}")).collect::<Vec<_>>().join("\n")
}

fn compile_pattern(pattern: &str) -> std::result::Result<Regex, CheckFailure> {
    Regex::new(pattern).map_err(|e| CheckFailure::InvalidExpectation {
        message: format!("bad regex '{pattern}': {e}"),
    })
}

impl Expectation {
    /// Check `response`, stopping at the first failed condition.
    ///
    /// Order: status, patterns that must match, patterns that must not
    /// match, schema.
    pub fn check(&self, response: &ApiResponse) -> std::result::Result<(), CheckFailure> {
        if let Some(depth) = self.show_schema {
            match schema_debug(&response.method, &response.url, &response.body, depth) {
                Ok(rendered) => println!("{rendered}"),
                Err(e) => warn!(error = %e, "Failed to render response schema"),
            }
        }

        if response.status != self.status {
            return Err(CheckFailure::Status {
                expected: self.status,
                actual: response.status,
                req_debug: response.req_debug.clone(),
            });
        }

        let text = response.text();
        for pattern in &self.matches {
            if !compile_pattern(pattern)?.is_match(&text) {
                return Err(CheckFailure::NotMatched {
                    pattern: pattern.clone(),
                    req_debug: response.req_debug.clone(),
                });
            }
        }
        for pattern in &self.not_matches {
            if compile_pattern(pattern)?.is_match(&text) {
                return Err(CheckFailure::Matched {
                    pattern: pattern.clone(),
                    req_debug: response.req_debug.clone(),
                });
            }
        }

        if let Some(schema) = &self.schema {
            let instance: Value = serde_json::from_str(&text).map_err(|e| CheckFailure::NotJson {
                message: e.to_string(),
                req_debug: response.req_debug.clone(),
            })?;
            let validator = SchemaValidator::compile(schema)
                .map_err(|e| CheckFailure::InvalidExpectation { message: e.to_string() })?;
            validator.validate(&instance).map_err(|violations| CheckFailure::Schema {
                violations,
                req_debug: response.req_debug.clone(),
            })?;
        }

        Ok(())
    }
}

/// Render the inferred schema of a response body for copy-pasting into a test.
///
/// A body that is not JSON yields a notice instead; an empty body is
/// described as an empty string.
pub fn schema_debug(method: &Method, url: &str, body: &[u8], depth: usize) -> Result<String> {
    let inferencer = SchemaInferencer::with_options(InferenceOptions::with_depth(depth));
    let mut out = format!("/************** request: [{method} {url}] ****************/");

    if body.is_empty() {
        let schema = inferencer.infer(&Value::String(String::new()));
        out.push('\n');
        out.push_str(&schema.to_pretty_string()?);
        return Ok(out);
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(value) => {
            let stars = "*".repeat(17);
            let header = format!("/{stars} schema of data(deep: {depth}) {stars}*/");
            out.push('\n');
            out.push_str(&header.cyan().to_string());
            out.push('\n');
            out.push_str(&inferencer.infer(&value).to_pretty_string()?);
        }
        Err(_) => {
            out.push('\n');
            out.push_str(
                &"Couldn't show schema, because the response body is not a valid json."
                    .yellow()
                    .to_string(),
            );
        }
    }
    Ok(out)
}

/// [`schema_debug`] at the default debugging depth
pub fn default_schema_debug(method: &Method, url: &str, body: &[u8]) -> Result<String> {
    schema_debug(method, url, body, DEBUG_DEPTH_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{fail_schema, ok_object_schema};
    use crate::signing::HeaderSet;
    use bytes::Bytes;
    use std::time::Duration;

    fn response(status: u16, body: &'static str) -> ApiResponse {
        ApiResponse {
            method: Method::POST,
            url: "http://h/v1/account/user/login".to_string(),
            status,
            headers: HeaderSet::new(),
            body: Bytes::from_static(body.as_bytes()),
            duration: Duration::from_millis(1),
            req_debug: "curl -v -k -X POST 'http://h/v1/account/user/login' -d '' -o /dev/null"
                .to_string(),
        }
    }

    #[test]
    fn test_default_expects_200() {
        let failure = Expectation::default().check(&response(500, "")).unwrap_err();
        assert!(matches!(failure, CheckFailure::Status { expected: 200, actual: 500, .. }));
        assert!(failure.to_string().starts_with("expect status (200), but res.status (500)"));
    }

    #[test]
    fn test_regex_checks() {
        let res = response(200, r#"{"ok":true,"reason":""}"#);
        let expect = Expectation { matches: vec![r#""ok":\s*true"#.into()], ..Default::default() };
        assert!(expect.check(&res).is_ok());

        let expect = Expectation { not_matches: vec!["ok".into()], ..Default::default() };
        assert!(matches!(expect.check(&res), Err(CheckFailure::Matched { .. })));

        let expect = Expectation { matches: vec!["ERR_".into()], ..Default::default() };
        assert!(matches!(expect.check(&res), Err(CheckFailure::NotMatched { .. })));

        let expect = Expectation { matches: vec!["(".into()], ..Default::default() };
        assert!(matches!(expect.check(&res), Err(CheckFailure::InvalidExpectation { .. })));
    }

    #[test]
    fn test_schema_check() {
        let ok = response(200, r#"{"ok":true,"reason":"","data":{}}"#);
        let expect = Expectation { schema: Some(ok_object_schema()), ..Default::default() };
        assert!(expect.check(&ok).is_ok());

        let fail = response(200, r#"{"ok":false,"reason":"ERR_ARGS_INVALID"}"#);
        match expect.check(&fail) {
            Err(CheckFailure::Schema { violations, req_debug }) => {
                assert!(!violations.is_empty());
                assert!(req_debug.starts_with("curl"));
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let expect = Expectation {
            status: 200,
            schema: Some(fail_schema("ERR_ARGS_INVALID")),
            ..Default::default()
        };
        assert!(expect.check(&fail).is_ok());
    }

    #[test]
    fn test_schema_check_on_non_json() {
        let expect = Expectation { schema: Some(ok_object_schema()), ..Default::default() };
        assert!(matches!(
            expect.check(&response(200, "<html>")),
            Err(CheckFailure::NotJson { .. })
        ));
    }

    #[test]
    fn test_schema_debug_output() {
        let out = schema_debug(&Method::GET, "http://h/a", br#"{"ok":true}"#, 4).unwrap();
        assert!(out.starts_with("/************** request: [GET http://h/a]"));
        assert!(out.contains("deep: 4"));
        assert!(out.contains("\"boolean\""));

        let out = schema_debug(&Method::GET, "http://h/a", b"", 4).unwrap();
        assert!(out.contains("\"string\""));

        let out = default_schema_debug(&Method::GET, "http://h/a", b"<html>").unwrap();
        assert!(out.contains("not a valid json"));
    }
}
