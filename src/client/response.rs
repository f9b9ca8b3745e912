//! Response returned by [`super::ApiClient`]

use bytes::Bytes;
use reqwest::Method;
use serde_json::Value;
use std::borrow::Cow;
use std::time::Duration;

use crate::errors::{Error, Result};
use crate::signing::HeaderSet;

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub method: Method,
    /// Final request URL including the query string
    pub url: String,
    pub status: u16,
    pub headers: HeaderSet,
    pub body: Bytes,
    pub duration: Duration,
    /// curl rendering of the request that produced this response
    pub req_debug: String,
}

impl ApiResponse {
    /// Body as text, with invalid UTF-8 replaced
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Body parsed as JSON
    pub fn json(&self) -> Result<Value> {
        serde_json::from_slice(&self.body).map_err(|e| {
            Error::serialization(e, format!("Response of [{}] is not JSON", self.req_debug))
        })
    }

    /// `data` member of an `{ok, reason, data}` envelope
    pub fn data(&self) -> Result<Value> {
        Ok(self.json()?.get("data").cloned().unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(body: &'static [u8]) -> ApiResponse {
        ApiResponse {
            method: Method::GET,
            url: "http://h/a".to_string(),
            status: 200,
            headers: HeaderSet::new(),
            body: Bytes::from_static(body),
            duration: Duration::from_millis(5),
            req_debug: "curl -v -k -X GET 'http://h/a' -o /dev/null".to_string(),
        }
    }

    #[test]
    fn test_json_and_data() {
        let res = response(br#"{"ok":true,"reason":"","data":{"id":7}}"#);
        assert_eq!(res.data().unwrap(), json!({"id": 7}));
        assert_eq!(response(b"{}").data().unwrap(), Value::Null);
    }

    #[test]
    fn test_non_json_body() {
        let res = response(b"<html>");
        assert_eq!(res.text(), "<html>");
        assert!(matches!(res.json(), Err(Error::Serialization { .. })));
    }
}
