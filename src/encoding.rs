//! Segment encoding for compact signed tokens.
//!
//! A signed guest token is three base64url segments joined by `.`:
//! `encode(header_json).encode(claims_json).encode(hmac_bytes)`.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: struct fields serialize in declaration order
//! - No HashMap allowed in signed data: field sets are fixed structs
//! - No padding: base64url without `=` so tokens are cookie-safe

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialize a value to canonical JSON bytes for signing.
///
/// The same input always produces the same bytes, so the HMAC over a
/// segment is reproducible at validation time.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("canonical serialization failed")
}

/// Encode a serializable value as a base64url token segment.
pub fn encode_segment<T: Serialize>(value: &T) -> String {
    URL_SAFE_NO_PAD.encode(to_canonical_bytes(value))
}

/// Encode raw bytes (the signature) as a base64url token segment.
pub fn encode_bytes(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode a base64url token segment into a value.
///
/// Returns `None` on any malformation; callers collapse this into the
/// single validation-failure outcome.
pub fn decode_segment<T: DeserializeOwned>(segment: &str) -> Option<T> {
    let bytes = URL_SAFE_NO_PAD.decode(segment).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Decode a base64url token segment into raw bytes.
pub fn decode_bytes(segment: &str) -> Option<Vec<u8>> {
    URL_SAFE_NO_PAD.decode(segment).ok()
}
