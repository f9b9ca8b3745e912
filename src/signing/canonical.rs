//! Canonical query strings and canonical header blocks
//!
//! Both are independent of insertion order: argument and header names are
//! sorted, and multi-valued entries are sorted before they are emitted.

use serde_json::Value;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use super::encoding::encode_component;
use super::headers::HeaderSet;
use crate::errors::{Error, Result};

/// Default prefix of custom headers that are always signed
pub const DEFAULT_HEADER_PREFIX: &str = "X-OA-";

/// Standard headers signed by default
pub const DEFAULT_SIGNED_HEADERS: [&str; 2] = ["host", "date"];

/// One query argument value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Text(String),
    /// Canonicalises to the empty string whatever its value
    Flag(bool),
    /// Emits one `name=value` pair per element, elements sorted
    List(Vec<String>),
}

impl QueryValue {
    /// Wire representation: one string per pair sent in the query string
    pub fn wire_values(&self) -> Vec<String> {
        match self {
            QueryValue::Text(s) => vec![s.clone()],
            QueryValue::Flag(b) => vec![b.to_string()],
            QueryValue::List(items) => items.clone(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Flag(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(value: Vec<String>) -> Self {
        QueryValue::List(value)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(value: Vec<&str>) -> Self {
        QueryValue::List(value.into_iter().map(str::to_string).collect())
    }
}

/// Query arguments keyed by name, kept in sorted order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryArgs {
    args: BTreeMap<String, QueryValue>,
}

impl QueryArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, replacing an earlier value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<QueryValue>) {
        self.args.insert(name.into(), value.into());
    }

    /// Builder form of [`QueryArgs::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add a value to `name`; a second value turns the entry into a list
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.args.entry(name.into()) {
            Entry::Vacant(slot) => {
                slot.insert(QueryValue::Text(value));
            }
            Entry::Occupied(mut slot) => {
                let existing = std::mem::replace(slot.get_mut(), QueryValue::List(Vec::new()));
                let mut items = match existing {
                    QueryValue::List(items) => items,
                    QueryValue::Text(first) => vec![first],
                    QueryValue::Flag(b) => vec![b.to_string()],
                };
                items.push(value);
                *slot.get_mut() = QueryValue::List(items);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.args.get(name)
    }

    /// Iterate in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.args.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `(name, value)` pairs as sent on the wire
    pub fn wire_pairs(&self) -> Vec<(String, String)> {
        self.args
            .iter()
            .flat_map(|(name, value)| {
                value.wire_values().into_iter().map(move |v| (name.clone(), v))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Convert a JSON object of arguments.
    ///
    /// Strings, booleans and arrays of strings are accepted; any other value
    /// is a caller error naming the argument.
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::validation("query arguments must be a JSON object"))?;

        let mut args = QueryArgs::new();
        for (name, value) in obj {
            let value = match value {
                Value::String(s) => QueryValue::Text(s.clone()),
                Value::Bool(b) => QueryValue::Flag(*b),
                Value::Array(items) => QueryValue::List(
                    items
                        .iter()
                        .map(|item| {
                            item.as_str().map(str::to_string).ok_or_else(|| {
                                Error::validation_field(
                                    format!("query argument '{name}' has a non-string element"),
                                    name.as_str(),
                                )
                            })
                        })
                        .collect::<Result<Vec<_>>>()?,
                ),
                other => {
                    return Err(Error::validation_field(
                        format!("query argument '{name}' has unsupported value {other}"),
                        name.as_str(),
                    ))
                }
            };
            args.insert(name.clone(), value);
        }
        Ok(args)
    }
}

/// Which headers take part in a signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningConfig {
    header_prefix: String,
    always_signed: BTreeSet<String>,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_PREFIX, DEFAULT_SIGNED_HEADERS)
    }
}

impl SigningConfig {
    /// Build a config. An empty prefix or an empty header list falls back to
    /// the defaults.
    pub fn new<I, S>(header_prefix: &str, always_signed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let header_prefix = if header_prefix.is_empty() {
            DEFAULT_HEADER_PREFIX.to_string()
        } else {
            header_prefix.to_string()
        };
        let mut signed: BTreeSet<String> =
            always_signed.into_iter().map(|h| h.as_ref().to_ascii_lowercase()).collect();
        if signed.is_empty() {
            signed = DEFAULT_SIGNED_HEADERS.iter().map(|h| h.to_string()).collect();
        }
        Self { header_prefix, always_signed: signed }
    }

    /// Custom header prefix as configured (e.g. `X-OA-`)
    pub fn header_prefix(&self) -> &str {
        &self.header_prefix
    }

    /// Standard headers that are always signed, lower-cased
    pub fn always_signed(&self) -> impl Iterator<Item = &str> {
        self.always_signed.iter().map(String::as_str)
    }

    /// Full name of a custom header, e.g. `custom_header("Sign")` → `X-OA-Sign`
    pub fn custom_header(&self, name: &str) -> String {
        format!("{}{}", self.header_prefix, name)
    }

    /// Header carrying the request signature
    pub fn signature_header(&self) -> String {
        self.custom_header("Sign")
    }

    /// Header carrying the caller's application id
    pub fn app_id_header(&self) -> String {
        self.custom_header("AppID")
    }

    /// Whether a lower-cased header name is part of the signed material
    pub fn is_signed(&self, lower_name: &str) -> bool {
        if lower_name == self.signature_header().to_ascii_lowercase() {
            return false;
        }
        self.always_signed.contains(lower_name)
            || lower_name.starts_with(&self.header_prefix.to_ascii_lowercase())
    }
}

/// Canonical header block and the manifest of names it covers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalHeaders {
    /// `name:value` lines joined by `\n`, names sorted
    pub block: String,
    /// Signed header names joined by `;`, same order
    pub signed_headers: String,
}

/// Canonical query string: names sorted, `name=value` pairs joined by `&`
pub fn canonical_query(args: &QueryArgs) -> String {
    let mut pairs = Vec::with_capacity(args.len());
    for (name, value) in args.iter() {
        let name = encode_component(name);
        match value {
            QueryValue::Text(text) => pairs.push(format!("{}={}", name, encode_component(text))),
            QueryValue::Flag(_) => pairs.push(format!("{}=", name)),
            QueryValue::List(items) => {
                let mut items: Vec<&str> = items.iter().map(String::as_str).collect();
                items.sort_unstable();
                for item in items {
                    pairs.push(format!("{}={}", name, encode_component(item)));
                }
            }
        }
    }
    pairs.join("&")
}

/// Select the signed headers and render them canonically
pub fn canonical_headers(headers: &HeaderSet, config: &SigningConfig) -> CanonicalHeaders {
    // HeaderSet iterates lower-cased names in sorted order
    let mut lines = Vec::new();
    let mut names = Vec::new();
    for (name, values) in headers.iter() {
        if !config.is_signed(name) {
            continue;
        }
        let mut values: Vec<&str> = values.iter().map(String::as_str).collect();
        values.sort_unstable();
        lines.push(format!("{}:{}", name, values.join(",").trim()));
        names.push(name);
    }
    CanonicalHeaders { block: lines.join("\n"), signed_headers: names.join(";") }
}
