//! Percent-encoding rules for canonical request strings
//!
//! Unreserved bytes `A-Z a-z 0-9 _ - ~ .` pass through; every other byte of the
//! UTF-8 input becomes `%XX` with uppercase hex. `/` is kept in paths and
//! encoded everywhere else. Input that already contains a `%XX` sequence is
//! assumed to be encoded and returned unchanged.

use regex::Regex;
use std::fmt::Write;
use std::sync::LazyLock;

static PERCENT_ENCODED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[0-9A-Fa-f]{2}").unwrap());

/// How `/` is treated by [`uri_encode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashMode {
    /// Keep `/` literal (URI paths)
    Preserve,
    /// Encode `/` as `%2F` (query names and values)
    Encode,
}

/// Whether `input` already contains a percent-encoded byte
pub fn is_encoded(input: &str) -> bool {
    PERCENT_ENCODED_REGEX.is_match(input)
}

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b'~' | b'.')
}

/// Percent-encode `input` byte by byte
pub fn uri_encode(input: &str, slash: SlashMode) -> String {
    if input.is_empty() || is_encoded(input) {
        return input.to_string();
    }

    let mut encoded = String::with_capacity(input.len() * 3);
    for &byte in input.as_bytes() {
        if is_unreserved(byte) || (byte == b'/' && slash == SlashMode::Preserve) {
            encoded.push(byte as char);
        } else {
            // writing to a String cannot fail
            let _ = write!(encoded, "%{:02X}", byte);
        }
    }
    encoded
}

/// Canonical form of a URI path: slashes kept
pub fn canonical_uri(path: &str) -> String {
    uri_encode(path, SlashMode::Preserve)
}

/// Canonical form of a query name or value: slashes encoded
pub fn encode_component(component: &str) -> String {
    uri_encode(component, SlashMode::Encode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreserved_pass_through() {
        let input = "AZaz09_-~.";
        assert_eq!(encode_component(input), input);
    }

    #[test]
    fn test_reserved_bytes_uppercase_hex() {
        assert_eq!(encode_component("a b"), "a%20b");
        assert_eq!(encode_component("a+b=c&d"), "a%2Bb%3Dc%26d");
        assert_eq!(encode_component("*"), "%2A");
    }

    #[test]
    fn test_slash_modes() {
        assert_eq!(canonical_uri("/a/b"), "/a/b");
        assert_eq!(encode_component("/a/b"), "%2Fa%2Fb");
    }

    #[test]
    fn test_already_encoded_is_untouched() {
        assert!(is_encoded("/a%20b"));
        assert!(is_encoded("x%2fy"));
        assert!(!is_encoded("100%"));
        assert!(!is_encoded("%zz"));
        assert_eq!(canonical_uri("/a%20b"), "/a%20b");
        assert_eq!(encode_component("a%2Fb c"), "a%2Fb c");
    }

    #[test]
    fn test_lone_percent_is_encoded() {
        assert_eq!(encode_component("100%"), "100%25");
    }

    #[test]
    fn test_utf8_encoded_per_byte() {
        assert_eq!(encode_component("é"), "%C3%A9");
        assert_eq!(canonical_uri("/用户"), "/%E7%94%A8%E6%88%B7");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(canonical_uri(""), "");
        assert_eq!(encode_component(""), "");
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let once = canonical_uri("/v1/account/user info");
        assert_eq!(canonical_uri(&once), once);
    }
}
