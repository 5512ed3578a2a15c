//! Guest identifier type.
//!
//! A guest identifier names one anonymous visitor for the lifetime of a
//! signed session token. It has no backing store: the identity lives only
//! inside the tokens that embed it.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// The all-zero placeholder GUID used by the hosting application before a
/// guest identity has been minted.
pub const PLACEHOLDER_GUEST_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Identifier for an anonymous guest session.
///
/// Wraps an owned string. Generated identifiers are UUID-v4 text, but the
/// token layer accepts any caller-supplied string so that identities minted
/// elsewhere (e.g. client-side) validate unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuestId(String);

impl GuestId {
    /// Create a guest identifier from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random guest identifier (UUID-v4).
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Derive a deterministic guest identifier from a seed string.
    ///
    /// The same seed always yields the same identifier; different seeds
    /// yield different identifiers. Used when an external stable key (such
    /// as an email address) should map to a stable identity.
    pub fn from_seed(seed: &str) -> Self {
        let digest = Sha256::digest(seed.as_bytes());

        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        // Stamp UUID version 4 and RFC 4122 variant bits so the derived
        // identifier is shaped like every generated one.
        bytes[6] = (bytes[6] & 0x0f) | 0x40;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;

        Self(Uuid::from_bytes(bytes).to_string())
    }

    /// The all-zero placeholder identifier.
    pub fn placeholder() -> Self {
        Self(PLACEHOLDER_GUEST_ID.to_string())
    }

    /// Whether this is the all-zero placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.0 == PLACEHOLDER_GUEST_ID
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for GuestId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for GuestId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
