//! curl rendering of outgoing requests
//!
//! Every request is logged (and every check failure reported) with an
//! equivalent curl command line so a failing case can be replayed by hand.

use reqwest::Method;

use crate::signing::{HeaderSet, QueryArgs};

/// Bodies this long or longer are truncated
pub const MAX_DEBUG_BODY: usize = 2000;

/// Bytes kept from a truncated body
pub const TRUNCATED_BODY_LEN: usize = 1023;

fn render_headers(headers: &HeaderSet) -> String {
    headers
        .iter()
        .filter(|(name, _)| *name != "user-agent")
        .flat_map(|(name, values)| values.iter().map(move |value| format!("-H'{name}: {value}'")))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_text_content(content_type: Option<&str>) -> bool {
    match content_type {
        None => true,
        Some(ct) => ct.starts_with("text") || ct == "application/json",
    }
}

fn render_body(headers: &HeaderSet, body: &[u8]) -> String {
    let content_type = headers.get("content-type");
    if !is_text_content(content_type) {
        return format!("[[not text body: {}]]", content_type.unwrap_or_default());
    }
    let shown = if body.len() < MAX_DEBUG_BODY { body } else { &body[..TRUNCATED_BODY_LEN] };
    String::from_utf8_lossy(shown).into_owned()
}

/// Render `url` with `args` appended as a form-encoded query string
pub fn url_with_args(url: &str, args: &QueryArgs) -> String {
    if args.is_empty() {
        return url.to_string();
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(args.wire_pairs())
        .finish();
    format!("{url}?{query}")
}

/// Render a request as a curl command.
///
/// Only `PUT`, `POST` and `DELETE` requests carry `-d`.
pub fn curl_command(
    method: &Method,
    url: &str,
    args: &QueryArgs,
    headers: &HeaderSet,
    body: &[u8],
) -> String {
    let mut parts = vec!["curl -v -k -X".to_string(), method.to_string()];

    let rendered_headers = render_headers(headers);
    if !rendered_headers.is_empty() {
        parts.push(rendered_headers);
    }
    parts.push(format!("'{}'", url_with_args(url, args)));

    if matches!(*method, Method::PUT | Method::POST | Method::DELETE) {
        parts.push(format!("-d '{}'", render_body(headers, body)));
    }
    parts.push("-o /dev/null".to_string());
    parts.join(" ")
}
