//! Error types for token issuance.
//!
//! Only issuance can fail visibly. Validation deliberately has no error
//! type: every failure mode (malformed structure, signature mismatch,
//! expiry) collapses into `None` so callers cannot be used as an oracle
//! for probing token structure.

/// Error raised when minting a guest session token.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The signing secret was empty.
    ///
    /// A missing secret is a deployment/programmer error, not a runtime
    /// condition to recover from.
    #[error("signing secret is empty; configure a shared HMAC secret")]
    MissingSecret,
}
