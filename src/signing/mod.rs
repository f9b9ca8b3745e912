//! # Request Signing
//!
//! Canonicalises the identity-relevant parts of an HTTP request (path, query
//! arguments, selected headers, body) and signs them with SHA-1 and a shared
//! application key. The same code verifies signatures on the receiving side.

pub mod canonical;
pub mod encoding;
pub mod headers;
pub mod signer;
pub mod verifier;

pub use canonical::{
    canonical_headers, canonical_query, CanonicalHeaders, QueryArgs, QueryValue, SigningConfig,
    DEFAULT_HEADER_PREFIX, DEFAULT_SIGNED_HEADERS,
};
pub use encoding::{canonical_uri, encode_component, is_encoded, uri_encode, SlashMode};
pub use headers::HeaderSet;
pub use signer::{sha1_hex, split_url, CanonicalRequest, RequestSigner, SignedRequest};
pub use verifier::{SignatureError, SignatureVerifier, VerifierConfig};
