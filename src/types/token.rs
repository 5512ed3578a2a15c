//! Signed guest session tokens: issuance and validation.
//!
//! ## Security Model
//!
//! A token is `base64url(header).base64url(claims).base64url(sig)` where
//! `sig = HMAC-SHA256(secret, "header.claims")`. Without the secret the
//! signature cannot be forged, so an attacker who knows a victim's guest
//! identifier still cannot mint a token that validates (session-fixation
//! prevention). The HMAC covers the received segment bytes, so changing
//! any single character anywhere in the token invalidates it.
//!
//! ## Failure Semantics
//!
//! Validation is silent and total: malformed structure, foreign header,
//! signature mismatch, and expiry all collapse into `None`. Callers are
//! expected to treat the visitor as a brand-new guest and mint a fresh
//! identity.

use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;

use super::claims::{GuestClaims, TokenHeader};
use super::error::TokenError;
use super::guest::GuestId;
use crate::encoding::{decode_bytes, decode_segment, encode_bytes, encode_segment};
use crate::DEFAULT_SESSION_TTL_DAYS;

/// HMAC-SHA256 output length in bytes.
const SIGNATURE_LENGTH: usize = 32;

/// A compact signed token binding a guest identifier to a session window.
///
/// Tokens are immutable once issued; extending a session means minting a
/// new token. The same token validates to the same guest identifier every
/// time until expiry, with no server-side state consulted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignedGuestToken(String);

impl SignedGuestToken {
    /// Issue a signed token for the given claim set.
    ///
    /// # Arguments
    /// * `secret` - The shared HMAC secret (32+ bytes recommended)
    /// * `claims` - The claim set to embed
    pub fn issue_hmac(secret: &[u8], claims: &GuestClaims) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let header = encode_segment(&TokenHeader::hs256());
        let payload = encode_segment(claims);
        let signature = encode_bytes(&Self::sign(secret, &header, &payload));

        Ok(Self(format!("{header}.{payload}.{signature}")))
    }

    /// Verify the signature and return the embedded claims.
    ///
    /// This checks structure, header, and signature but NOT the time
    /// window; callers that need liveness use [`validate_hmac`] or check
    /// [`GuestClaims::is_live`] themselves.
    ///
    /// Uses constant-time comparison to prevent timing attacks.
    ///
    /// [`validate_hmac`]: SignedGuestToken::validate_hmac
    pub fn verified_claims(&self, secret: &[u8]) -> Option<GuestClaims> {
        if secret.is_empty() {
            return None;
        }

        let mut segments = self.0.split('.');
        let header_segment = segments.next()?;
        let payload_segment = segments.next()?;
        let signature_segment = segments.next()?;
        if segments.next().is_some() {
            return None;
        }

        let header: TokenHeader = decode_segment(header_segment)?;
        if !header.is_supported() {
            return None;
        }

        // The HMAC is recomputed over the segments exactly as received,
        // so any tampering with header or payload shows up here.
        let expected = Self::sign(secret, header_segment, payload_segment);
        let presented = decode_bytes(signature_segment)?;
        if !constant_time_eq(&presented, &expected) {
            return None;
        }

        decode_segment(payload_segment)
    }

    /// Validate this token and return the guest identifier it binds.
    ///
    /// Returns `Some(guest_id)` iff the signature verifies against
    /// `secret` and the current time falls within `[nbf, exp)`. Every
    /// failure mode returns `None`.
    pub fn validate_hmac(&self, secret: &[u8]) -> Option<GuestId> {
        self.validate_hmac_at(secret, Utc::now().timestamp())
    }

    /// Validate against an explicit clock (epoch seconds).
    pub fn validate_hmac_at(&self, secret: &[u8], now: i64) -> Option<GuestId> {
        let claims = self.verified_claims(secret)?;
        if !claims.is_live(now) {
            return None;
        }
        Some(claims.guest_id)
    }

    /// Check if this looks like a compact token: three non-empty
    /// dot-separated segments.
    pub fn is_valid_format(&self) -> bool {
        let segments: Vec<&str> = self.0.split('.').collect();
        segments.len() == 3 && segments.iter().all(|s| !s.is_empty())
    }

    /// Get the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create a token from a string presented by a visitor.
    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    /// Compute the HMAC-SHA256 signature over `header.payload`.
    fn sign(secret: &[u8], header_segment: &str, payload_segment: &str) -> [u8; SIGNATURE_LENGTH] {
        let mut mac =
            Hmac::<Sha256>::new_from_slice(secret).expect("HMAC accepts any key size");
        mac.update(header_segment.as_bytes());
        mac.update(b".");
        mac.update(payload_segment.as_bytes());
        mac.finalize().into_bytes().into()
    }
}

impl fmt::Display for SignedGuestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SignedGuestToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Compare two byte slices without short-circuiting on the first mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(true, |acc, (x, y)| acc && (x == y))
}

/// Mint a signed guest session token.
///
/// Pure function of its inputs plus the current time: the same
/// `(guest_id, secret)` pair issued at different instants yields different
/// tokens, all of which validate to the same guest identifier while
/// unexpired.
///
/// # Arguments
/// * `guest_id` - A freshly generated guest identifier
/// * `secret` - The shared signing secret
/// * `expiry_days` - Session lifetime offset; defaults to
///   [`DEFAULT_SESSION_TTL_DAYS`]. Negative values produce an
///   already-expired token (testing hook).
pub fn create_guest_session_token(
    guest_id: &GuestId,
    secret: &str,
    expiry_days: Option<i64>,
) -> Result<SignedGuestToken, TokenError> {
    let ttl_days = expiry_days.unwrap_or(DEFAULT_SESSION_TTL_DAYS);
    let claims = GuestClaims::new(guest_id.clone(), ttl_days);
    SignedGuestToken::issue_hmac(secret.as_bytes(), &claims)
}

/// Validate a token string and return the guest identifier it binds.
///
/// Never panics and never errors: any malformed, tampered, foreign-secret,
/// or expired token yields `None`, with no indication of which check
/// failed.
pub fn validate_guest_session_token(token: &str, secret: &str) -> Option<GuestId> {
    SignedGuestToken::from_string(token.to_string()).validate_hmac(secret.as_bytes())
}
