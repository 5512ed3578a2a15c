//! Token header and payload claims.
//!
//! The claim set mirrors what the hosting application's auth boundary
//! stamps into guest tokens: issuer, audience, subject, role, the guest
//! identifier, and the issued-at / not-before / expiry instants.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::guest::GuestId;
use crate::{GUEST_ROLE, GUEST_TOKEN_AUDIENCE, GUEST_TOKEN_ISSUER, TOKEN_ALGORITHM, TOKEN_TYPE};

/// Seconds per day, for day-denominated expiry offsets.
const SECONDS_PER_DAY: i64 = 86_400;

/// Compact token header: algorithm + type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    /// Signing algorithm identifier (always `HS256`).
    pub alg: String,
    /// Token type tag (always `JWT`).
    pub typ: String,
}

impl TokenHeader {
    /// The header every guest token carries.
    pub fn hs256() -> Self {
        Self {
            alg: TOKEN_ALGORITHM.to_string(),
            typ: TOKEN_TYPE.to_string(),
        }
    }

    /// Whether this header names the one algorithm the kernel signs with.
    ///
    /// Rejecting foreign `alg` values up front closes the classic
    /// algorithm-confusion hole (e.g. `alg: none`).
    pub fn is_supported(&self) -> bool {
        self.alg == TOKEN_ALGORITHM && self.typ == TOKEN_TYPE
    }
}

impl Default for TokenHeader {
    fn default() -> Self {
        Self::hs256()
    }
}

/// Claim set embedded in the payload segment of a guest token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestClaims {
    /// Issuer of the token.
    pub iss: String,
    /// Intended audience.
    pub aud: String,
    /// Subject (`guest` for anonymous sessions).
    pub sub: String,
    /// Role granted to the bearer (`guest`).
    pub role: String,
    /// The guest identifier this token binds.
    #[serde(rename = "guestId")]
    pub guest_id: GuestId,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Not-before, seconds since the Unix epoch.
    pub nbf: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl GuestClaims {
    /// Build a claim set for a guest identifier, expiring `ttl_days` from
    /// now.
    ///
    /// A negative `ttl_days` produces an already-expired claim set, which
    /// tests use to exercise the expiry path without sleeping.
    pub fn new(guest_id: GuestId, ttl_days: i64) -> Self {
        Self::at(guest_id, ttl_days, Utc::now().timestamp())
    }

    /// Build a claim set issued at an explicit instant.
    pub fn at(guest_id: GuestId, ttl_days: i64, issued_at: i64) -> Self {
        Self {
            iss: GUEST_TOKEN_ISSUER.to_string(),
            aud: GUEST_TOKEN_AUDIENCE.to_string(),
            sub: GUEST_ROLE.to_string(),
            role: GUEST_ROLE.to_string(),
            guest_id,
            iat: issued_at,
            nbf: issued_at,
            exp: issued_at + ttl_days * SECONDS_PER_DAY,
        }
    }

    /// Whether the expiry has passed at `now` (epoch seconds).
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.exp
    }

    /// Whether the token is being presented before its not-before instant.
    pub fn is_premature(&self, now: i64) -> bool {
        now < self.nbf
    }

    /// Whether the token is live at `now`: within `[nbf, exp)`.
    pub fn is_live(&self, now: i64) -> bool {
        !self.is_expired(now) && !self.is_premature(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_is_supported() {
        assert!(TokenHeader::hs256().is_supported());

        let foreign = TokenHeader {
            alg: "none".to_string(),
            typ: TOKEN_TYPE.to_string(),
        };
        assert!(!foreign.is_supported());
    }

    #[test]
    fn test_claims_stamp_guest_role() {
        let claims = GuestClaims::new(GuestId::random(), 7);
        assert_eq!(claims.sub, "guest");
        assert_eq!(claims.role, "guest");
        assert_eq!(claims.iss, GUEST_TOKEN_ISSUER);
        assert_eq!(claims.aud, GUEST_TOKEN_AUDIENCE);
    }

    #[test]
    fn test_expiry_offset_in_days() {
        let claims = GuestClaims::at(GuestId::random(), 7, 1_000);
        assert_eq!(claims.iat, 1_000);
        assert_eq!(claims.nbf, 1_000);
        assert_eq!(claims.exp, 1_000 + 7 * SECONDS_PER_DAY);
    }

    #[test]
    fn test_negative_ttl_is_already_expired() {
        let claims = GuestClaims::at(GuestId::random(), -1, 1_000_000);
        assert!(claims.is_expired(1_000_000));
        // Still expired after any additional delay
        assert!(claims.is_expired(1_000_000 + SECONDS_PER_DAY * 365));
    }

    #[test]
    fn test_liveness_window() {
        let claims = GuestClaims::at(GuestId::random(), 1, 1_000);
        assert!(claims.is_premature(999));
        assert!(claims.is_live(1_000));
        assert!(claims.is_live(1_000 + SECONDS_PER_DAY - 1));
        assert!(claims.is_expired(1_000 + SECONDS_PER_DAY));
    }

    #[test]
    fn test_guest_id_serializes_camel_case() {
        let claims = GuestClaims::at(GuestId::new("abc-123"), 1, 0);
        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("\"guestId\":\"abc-123\""));
    }
}
