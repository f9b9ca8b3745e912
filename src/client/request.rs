//! Request description for [`super::ApiClient`]

use reqwest::Method;
use serde_json::Value;

use super::expectation::Expectation;
use crate::errors::{Error, Result};
use crate::signing::{HeaderSet, QueryArgs, QueryValue};

/// Request body
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialised with `serde_json` and sent as `application/json`
    Json(Value),
    /// Sent verbatim
    Text(String),
    /// Sent verbatim with the given content type
    Raw { bytes: Vec<u8>, content_type: String },
}

impl RequestBody {
    /// Exact bytes put on the wire (and signed)
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            RequestBody::Json(value) => serde_json::to_vec(value)
                .map_err(|e| Error::serialization(e, "Failed to serialize request body")),
            RequestBody::Text(text) => Ok(text.clone().into_bytes()),
            RequestBody::Raw { bytes, .. } => Ok(bytes.clone()),
        }
    }

    /// Content type implied by the body kind
    pub fn content_type(&self) -> Option<&str> {
        match self {
            RequestBody::Json(_) => Some("application/json"),
            RequestBody::Text(_) => None,
            RequestBody::Raw { content_type, .. } => Some(content_type),
        }
    }
}

/// One request plus what its response must look like
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute URL, or a path starting with `/` joined to the server address
    pub url: String,
    pub headers: HeaderSet,
    pub args: QueryArgs,
    pub body: Option<RequestBody>,
    pub expect: Expectation,
    /// Count this request in the shared statistics
    pub stat_time: bool,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderSet::new(),
            args: QueryArgs::new(),
            body: None,
            expect: Expectation::default(),
            stat_time: true,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn arg(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.args.insert(name, value);
        self
    }

    pub fn args(mut self, args: QueryArgs) -> Self {
        self.args = args;
        self
    }

    /// JSON body; sets `Content-Type: application/json` unless already set
    pub fn json(self, value: Value) -> Self {
        self.body(RequestBody::Json(value))
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.body(RequestBody::Text(text.into()))
    }

    pub fn raw(self, bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        self.body(RequestBody::Raw { bytes, content_type: content_type.into() })
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        if let Some(ct) = body.content_type() {
            if !self.headers.contains("content-type") {
                self.headers.insert("Content-Type", ct);
            }
        }
        self.body = Some(body);
        self
    }

    /// Expected response status (default 200)
    pub fn status(mut self, status: u16) -> Self {
        self.expect.status = status;
        self
    }

    /// JSON schema the response body must satisfy
    pub fn schema(mut self, schema: Value) -> Self {
        self.expect.schema = Some(schema);
        self
    }

    /// Regex the response text must match
    pub fn matches(mut self, pattern: impl Into<String>) -> Self {
        self.expect.matches.push(pattern.into());
        self
    }

    /// Regex the response text must not match
    pub fn not_matches(mut self, pattern: impl Into<String>) -> Self {
        self.expect.not_matches.push(pattern.into());
        self
    }

    /// Print the inferred schema of the response body, expanded to `depth`
    pub fn show_schema(mut self, depth: usize) -> Self {
        self.expect.show_schema = Some(depth);
        self
    }

    pub fn stat_time(mut self, enabled: bool) -> Self {
        self.stat_time = enabled;
        self
    }
}
