//! # HTTP Test Client
//!
//! Sends requests to the account server, signs them when credentials are
//! configured, times them, and checks responses against an [`Expectation`].
//!
//! ```rust,no_run
//! use account_testkit::client::{ApiClient, ApiRequest};
//! use account_testkit::config::Settings;
//! use account_testkit::schema::ok_object_schema;
//! use serde_json::json;
//!
//! # async fn run() -> account_testkit::Result<()> {
//! let client = ApiClient::new(&Settings::from_env()?)?;
//! let res = client
//!     .execute(
//!         ApiRequest::post("/v1/account/user/login")
//!             .json(json!({"tel": "13000000001", "password": "123456"}))
//!             .schema(ok_object_schema()),
//!     )
//!     .await?;
//! println!("{}", res.data()?);
//! # Ok(())
//! # }
//! ```

pub mod curl;
pub mod expectation;
pub mod request;
pub mod response;
pub mod stats;

pub use curl::curl_command;
pub use expectation::{default_schema_debug, schema_debug, CheckFailure, Expectation};
pub use request::{ApiRequest, RequestBody};
pub use response::ApiResponse;
pub use stats::{RequestStats, StatsSnapshot};

use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn, Instrument};

use crate::config::Settings;
use crate::errors::{Error, Result};
use crate::signing::{split_url, HeaderSet, QueryValue, RequestSigner, SignedRequest};

/// Application credentials used to sign requests
#[derive(Clone)]
pub struct Credentials {
    pub app_id: String,
    pub app_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("app_id", &self.app_id).finish_non_exhaustive()
    }
}

/// HTTP client for the account server
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    server: String,
    signer: RequestSigner,
    credentials: Option<Credentials>,
    sign_host: bool,
    stats: Arc<RequestStats>,
}

impl ApiClient {
    /// Create a client from settings
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout())
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()
            .map_err(|e| Error::Transport {
                message: "Failed to build HTTP client".to_string(),
                source: Some(e),
            })?;

        let credentials = settings.credentials().map(|(id, key)| Credentials {
            app_id: id.to_string(),
            app_key: key.to_string(),
        });

        Ok(Self {
            http,
            server: settings.server.trim_end_matches('/').to_string(),
            signer: RequestSigner::new(settings.signing_config()),
            credentials,
            sign_host: settings.sign_host,
            stats: Arc::new(RequestStats::new()),
        })
    }

    /// Share statistics with other clients
    pub fn with_stats(mut self, stats: Arc<RequestStats>) -> Self {
        self.stats = stats;
        self
    }

    /// Replace (or clear) the signing credentials
    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Add or remove the explicit `Host` header on signed requests
    pub fn with_sign_host(mut self, sign_host: bool) -> Self {
        self.sign_host = sign_host;
        self
    }

    pub fn stats(&self) -> &Arc<RequestStats> {
        &self.stats
    }

    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// Join a relative path to the server address; absolute URLs pass through
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with('/') {
            format!("{}{}", self.server, url)
        } else {
            url.to_string()
        }
    }

    /// Send `request` and check the response against its expectation
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let response = self.send(&request).await?;
        request.expect.check(&response)?;
        Ok(response)
    }

    /// Send `request` without checking the response
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let full_url = self.resolve_url(&request.url);
        let parsed = url::Url::parse(&full_url)
            .map_err(|e| Error::validation_field(format!("invalid URL '{full_url}': {e}"), "url"))?;

        let body = match &request.body {
            Some(body) => body.to_bytes()?,
            None => Vec::new(),
        };

        let mut headers = self.outgoing_headers(request, &parsed);
        let signed = self.sign(&full_url, request, &mut headers, &body)?;

        let req_debug = curl_command(&request.method, &full_url, &request.args, &headers, &body);
        let span = crate::request_span!(request.method, parsed.path());

        async move {
            info!("REQUEST [ {} ]", req_debug);

            let mut builder = self.http.request(request.method.clone(), parsed);
            if !request.args.is_empty() {
                builder = builder.query(&request.args.wire_pairs());
            }
            for (name, values) in headers.iter() {
                for value in values {
                    builder = builder.header(name, value.as_str());
                }
            }
            if request.body.is_some() {
                builder = builder.body(body);
            }

            let started = Instant::now();
            let result = builder.send().await;
            let response = match result {
                Ok(response) => response,
                Err(e) => {
                    error!(error = %e, "REQUEST [ {} ] failed", req_debug);
                    return Err(Error::from(e));
                }
            };
            let status = response.status().as_u16();
            let url = response.url().to_string();
            let response_headers = HeaderSet::from(response.headers());
            let response_body = response.bytes().await?;
            let duration = started.elapsed();

            if request.stat_time {
                self.stats.record(duration);
            }

            if status >= 400 {
                warn!(
                    status,
                    duration = duration.as_secs_f64(),
                    body = %String::from_utf8_lossy(&response_body),
                    "FAIL REQUEST [ {} ]",
                    req_debug
                );
                if status == 401 {
                    if let Some(signed) = &signed {
                        warn!(
                            signature = %signed.signature,
                            signing_string = %signed.signing_string,
                            "Request was signed but rejected"
                        );
                    }
                }
            } else {
                info!(status, duration = duration.as_secs_f64(), "REQUEST [ {} ]", req_debug);
            }

            Ok(ApiResponse {
                method: request.method.clone(),
                url,
                status,
                headers: response_headers,
                body: response_body,
                duration,
                req_debug,
            })
        }
        .instrument(span)
        .await
    }

    /// Request headers plus `Host` (host[:port]) when it is signed.
    ///
    /// Without credentials, or with `sign_host` off, the transport supplies
    /// `Host` and it stays out of the signature.
    fn outgoing_headers(&self, request: &ApiRequest, parsed: &url::Url) -> HeaderSet {
        let mut headers = request.headers.clone();
        if self.credentials.is_none() || !self.sign_host || headers.contains("host") {
            return headers;
        }
        if let Some(host) = parsed.host_str() {
            let host = match parsed.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            };
            headers.insert("Host", host);
        }
        headers
    }

    /// Add the app id and signature headers when credentials are configured.
    ///
    /// The signed query holds exactly the pairs sent: the URL's own query
    /// string followed by the request arguments. Flag arguments are rejected
    /// because they sign as an empty value but travel as `true`/`false`.
    fn sign(
        &self,
        full_url: &str,
        request: &ApiRequest,
        headers: &mut HeaderSet,
        body: &[u8],
    ) -> Result<Option<SignedRequest>> {
        let Some(credentials) = &self.credentials else {
            return Ok(None);
        };
        let config = self.signer.config();
        let _span = crate::signing_span!(full_url, app_id = %credentials.app_id).entered();

        headers.insert(config.app_id_header(), credentials.app_id.clone());

        if let Some((name, _)) =
            request.args.iter().find(|(_, value)| matches!(value, QueryValue::Flag(_)))
        {
            return Err(Error::validation_field(
                format!("flag argument '{name}' cannot be signed; pass it as a string"),
                name,
            ));
        }

        let (path, mut query) = split_url(full_url)?;
        for (name, value) in request.args.wire_pairs() {
            query.append(name, value);
        }

        let signed = self.signer.sign(&path, &query, headers, body, Some(&credentials.app_key));
        headers.insert(config.signature_header(), signed.signature.clone());
        Ok(Some(signed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            server: "http://127.0.0.1:2021/".to_string(),
            app_id: Some("app-1".to_string()),
            app_key: Some("secret".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_url() {
        let client = ApiClient::new(&settings()).unwrap();
        assert_eq!(client.resolve_url("/v1/user/info"), "http://127.0.0.1:2021/v1/user/info");
        assert_eq!(client.resolve_url("https://other/x"), "https://other/x");
    }

    #[test]
    fn test_sign_adds_headers() {
        let client = ApiClient::new(&settings()).unwrap();
        let request = ApiRequest::get("/v1/user/info").arg("id", "7");
        let mut headers = HeaderSet::new().with("Host", "127.0.0.1:2021");
        let signed = client
            .sign("http://127.0.0.1:2021/v1/user/info", &request, &mut headers, b"")
            .unwrap()
            .unwrap();

        assert_eq!(headers.get("x-oa-appid"), Some("app-1"));
        assert_eq!(headers.get("x-oa-sign"), Some(signed.signature.as_str()));
        assert!(signed.signing_string.starts_with("/v1/user/info\nid=7\n"));
        assert!(signed.signing_string.ends_with("\nsecret"));
        assert!(signed.signing_string.contains("x-oa-appid:app-1"));
    }

    #[test]
    fn test_no_credentials_no_signature() {
        let client = ApiClient::new(&Settings::default()).unwrap();
        let request = ApiRequest::get("/a");
        let mut headers = HeaderSet::new();
        assert!(client.sign("http://h/a", &request, &mut headers, b"").unwrap().is_none());
        assert!(headers.is_empty());
    }

    #[test]
    fn test_signed_query_keeps_url_and_arg_values() {
        let client = ApiClient::new(&settings()).unwrap();
        let request = ApiRequest::get("/v1/user/info?id=1").arg("id", "2");
        let mut headers = HeaderSet::new();
        let signed = client
            .sign("http://127.0.0.1:2021/v1/user/info?id=1", &request, &mut headers, b"")
            .unwrap()
            .unwrap();
        assert!(signed.signing_string.starts_with("/v1/user/info\nid=1&id=2\n"));
    }

    #[test]
    fn test_flag_argument_is_rejected_when_signing() {
        let client = ApiClient::new(&settings()).unwrap();
        let request = ApiRequest::get("/v1/user/info").arg("debug", true);
        let err = client
            .sign("http://127.0.0.1:2021/v1/user/info", &request, &mut HeaderSet::new(), b"")
            .unwrap_err();
        match err {
            Error::Validation { field, .. } => assert_eq!(field.as_deref(), Some("debug")),
            other => panic!("unexpected error: {other:?}"),
        }

        let unsigned = ApiClient::new(&Settings::default()).unwrap();
        let signed = unsigned.sign("http://h/a", &request, &mut HeaderSet::new(), b"").unwrap();
        assert!(signed.is_none());
    }

    #[test]
    fn test_host_header_follows_sign_host() {
        let parsed = url::Url::parse("http://127.0.0.1:2021/v1/user/info").unwrap();
        let request = ApiRequest::get("/v1/user/info");

        let client = ApiClient::new(&settings()).unwrap();
        let headers = client.outgoing_headers(&request, &parsed);
        assert_eq!(headers.get("host"), Some("127.0.0.1:2021"));

        let client = client.with_sign_host(false);
        assert!(!client.outgoing_headers(&request, &parsed).contains("host"));

        let unsigned = ApiClient::new(&Settings::default()).unwrap();
        assert!(!unsigned.outgoing_headers(&request, &parsed).contains("host"));
    }

    #[test]
    fn test_debug_hides_app_key() {
        let creds = Credentials { app_id: "app".into(), app_key: "top-secret".into() };
        assert!(!format!("{creds:?}").contains("top-secret"));
    }
}
