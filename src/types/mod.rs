//! Core types for the guest session kernel.

pub mod claims;
pub mod error;
pub mod guest;
pub mod token;
pub mod verification;

pub use claims::{GuestClaims, TokenHeader};
pub use error::TokenError;
pub use guest::GuestId;
pub use token::{create_guest_session_token, validate_guest_session_token, SignedGuestToken};
pub use verification::{
    CacheConfig, CacheStats, TokenVerifier, VerificationMode, VerificationResult,
};
