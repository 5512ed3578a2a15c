//! # guest-session-kernel
//!
//! Signed, expiring guest-session tokens for anonymous visitor tracking.
//!
//! The kernel answers one question:
//!
//! > Given an opaque token presented by a visitor, is it the same anonymous
//! > guest we issued a session to, and is that session still live?
//!
//! ## Core Contract
//!
//! 1. Mint a compact signed token binding a random guest identifier to a
//!    time-boxed session
//! 2. Validate presented tokens against the shared secret and expiry
//! 3. Collapse every validation failure into a single negative outcome
//!
//! ## Architecture
//!
//! ```text
//! GuestId → GuestClaims → SignedGuestToken ──cookie──▶ visitor
//!                              │
//!                  validate(token, secret) → Option<GuestId>
//! ```
//!
//! ## Security Guarantees
//!
//! - Tokens are HMAC-SHA256 signed; forging one requires the secret
//! - Flipping any single character of a token invalidates it
//! - Validation never reveals *why* a token was rejected
//! - Tokens are immutable; extending a session mints a new token

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod encoding;
pub mod session;
pub mod types;

#[cfg(feature = "service")]
pub mod service;

// Re-exports
pub use types::claims::{GuestClaims, TokenHeader};
pub use types::error::TokenError;
pub use types::guest::GuestId;
pub use types::token::{
    create_guest_session_token, validate_guest_session_token, SignedGuestToken,
};
pub use types::verification::{
    CacheConfig, CacheStats, TokenVerifier, VerificationMode, VerificationResult,
};

pub use session::{GuestSessionService, SessionOutcome};

// Service re-exports (when service feature is enabled)
#[cfg(feature = "service")]
pub use service::{create_router, ServiceState};

/// Signing algorithm tag carried in the token header.
pub const TOKEN_ALGORITHM: &str = "HS256";

/// Token type tag carried in the token header.
pub const TOKEN_TYPE: &str = "JWT";

/// Default session lifetime in days when the caller does not specify one.
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 7;

/// Issuer claim stamped into every guest token.
pub const GUEST_TOKEN_ISSUER: &str = "https://auth.arolariu.ro";

/// Audience claim stamped into every guest token.
pub const GUEST_TOKEN_AUDIENCE: &str = "https://api.arolariu.ro";

/// Subject and role claim value for anonymous sessions.
pub const GUEST_ROLE: &str = "guest";
