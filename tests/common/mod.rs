//! Shared helpers for integration tests
//!
//! Provides a wiremock-based stand-in for the account server, including a
//! responder that enforces request signatures the way the real server does.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use account_testkit::config::Settings;
use account_testkit::signing::{
    split_url, HeaderSet, RequestSigner, SignatureVerifier, SigningConfig, VerifierConfig,
};
use serde_json::{json, Value};
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

pub const TEST_APP_ID: &str = "test-app";
pub const TEST_APP_KEY: &str = "test-app-key";

/// Settings pointing at `server` without signing credentials
pub fn settings_for(server: &MockServer) -> Settings {
    Settings { server: server.uri(), timeout_secs: 5, ..Default::default() }
}

/// Settings pointing at `server` with the test credentials
pub fn signed_settings_for(server: &MockServer) -> Settings {
    Settings {
        app_id: Some(TEST_APP_ID.to_string()),
        app_key: Some(TEST_APP_KEY.to_string()),
        ..settings_for(server)
    }
}

/// `{"ok": true, "reason": "", "data": data}`
pub fn ok_body(data: Value) -> Value {
    json!({ "ok": true, "reason": "", "data": data })
}

/// `{"ok": false, "reason": reason, "data": {}}`
pub fn fail_body(reason: &str) -> Value {
    json!({ "ok": false, "reason": reason, "data": {} })
}

/// Verifier that knows the test app and requires signatures on `paths`
pub fn test_verifier(paths: &[&str]) -> SignatureVerifier {
    let config = VerifierConfig {
        app_keys: HashMap::from([(TEST_APP_ID.to_string(), TEST_APP_KEY.to_string())]),
        signed_paths: paths.iter().map(|p| p.to_string()).collect::<HashSet<_>>(),
        ..VerifierConfig::default()
    };
    SignatureVerifier::new(RequestSigner::new(SigningConfig::default()), config)
}

/// Responds like the account server's signature middleware: 401 with a
/// failure envelope when the signature is bad, otherwise `ok_body(data)`.
pub struct SignatureCheckingResponder {
    pub verifier: SignatureVerifier,
    pub data: Value,
    /// Verify without `Host`, like a Go `net/http` server
    pub drop_host: bool,
}

impl SignatureCheckingResponder {
    pub fn new(paths: &[&str], data: Value) -> Self {
        Self { verifier: test_verifier(paths), data, drop_host: false }
    }
}

impl Respond for SignatureCheckingResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let path = request.url.path();
        if !self.verifier.requires_signature(request.method.as_str(), path) {
            return ResponseTemplate::new(200).set_body_json(ok_body(self.data.clone()));
        }

        let (path, query) = match split_url(request.url.as_str()) {
            Ok(parts) => parts,
            Err(_) => {
                return ResponseTemplate::new(400).set_body_json(fail_body("ERR_ARGS_INVALID"))
            }
        };
        let mut headers = HeaderSet::from(&request.headers);
        if self.drop_host {
            headers.remove("host");
        }

        match self.verifier.verify(&path, &query, &headers, &request.body) {
            Ok(()) => ResponseTemplate::new(200).set_body_json(ok_body(self.data.clone())),
            Err(e) => ResponseTemplate::new(401).set_body_json(json!({
                "ok": false,
                "reason": "ERR_SIGN_ERROR",
                "data": {"error": e.to_string()}
            })),
        }
    }
}
