//! Guest session lifecycle: establish, resume, reissue.
//!
//! The hosting application's contract is simple: an unauthenticated
//! visitor always leaves with a live session. If the presented token
//! validates, the existing identity continues; on any validation failure
//! the visitor is treated as brand-new and a fresh identity is minted.
//! There is no user-visible error tied to token failure.

use crate::types::error::TokenError;
use crate::types::guest::GuestId;
use crate::types::token::{create_guest_session_token, SignedGuestToken};
use crate::DEFAULT_SESSION_TTL_DAYS;

/// Environment variable holding the shared signing secret.
pub const SECRET_ENV_VAR: &str = "GUEST_SESSION_HMAC_SECRET";

/// Outcome of presenting a token to [`GuestSessionService::resume`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The presented token was valid; the existing identity continues.
    /// The original token stays in use until its expiry.
    Resumed {
        /// The guest identifier embedded in the presented token.
        guest_id: GuestId,
    },
    /// The presented token was missing, malformed, tampered, or expired.
    /// A brand-new identity and token were minted.
    Reissued {
        /// The freshly minted guest identifier.
        guest_id: GuestId,
        /// The freshly minted token to hand back to the visitor.
        token: SignedGuestToken,
    },
}

impl SessionOutcome {
    /// The guest identifier for this session, whichever way it was reached.
    pub fn guest_id(&self) -> &GuestId {
        match self {
            Self::Resumed { guest_id } => guest_id,
            Self::Reissued { guest_id, .. } => guest_id,
        }
    }

    /// Whether an existing session was continued.
    pub fn is_resumed(&self) -> bool {
        matches!(self, Self::Resumed { .. })
    }
}

/// Stateless guest session manager.
///
/// Holds only read-only configuration (the secret and the session TTL);
/// every call is an independent, synchronous computation, so a single
/// instance is safe to share across any number of concurrent requests.
#[derive(Debug, Clone)]
pub struct GuestSessionService {
    secret: String,
    ttl_days: i64,
}

impl GuestSessionService {
    /// Create a session service with an explicit secret and TTL.
    pub fn new(secret: impl Into<String>, ttl_days: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_days,
        }
    }

    /// Create a session service with the default TTL.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self::new(secret, DEFAULT_SESSION_TTL_DAYS)
    }

    /// Create a session service from environment variables.
    ///
    /// Reads `GUEST_SESSION_HMAC_SECRET`. Falls back to a development
    /// secret if not set.
    pub fn from_env() -> Self {
        let secret = std::env::var(SECRET_ENV_VAR).unwrap_or_else(|_| {
            tracing::warn!(
                "{} not set, using development secret. Set this for production!",
                SECRET_ENV_VAR
            );
            "development_only_secret_not_for_production".to_string()
        });

        Self::with_secret(secret)
    }

    /// Establish a brand-new guest session.
    ///
    /// Mints a fresh random identifier and a signed token binding it.
    pub fn establish(&self) -> Result<(GuestId, SignedGuestToken), TokenError> {
        let guest_id = GuestId::random();
        let token = create_guest_session_token(&guest_id, &self.secret, Some(self.ttl_days))?;

        tracing::debug!(guest_id = %guest_id, "established guest session");
        Ok((guest_id, token))
    }

    /// Resume a session from a presented token, or reissue a fresh one.
    ///
    /// The whole lifecycle in one call: a session is created on first
    /// visit, re-validated on each request, and discarded (not renewed)
    /// once expired, at which point a new identity is minted.
    pub fn resume(&self, presented: &str) -> Result<SessionOutcome, TokenError> {
        let token = SignedGuestToken::from_string(presented.to_string());

        if let Some(guest_id) = token.validate_hmac(self.secret.as_bytes()) {
            tracing::debug!(guest_id = %guest_id, "resumed guest session");
            return Ok(SessionOutcome::Resumed { guest_id });
        }

        let (guest_id, token) = self.establish()?;
        tracing::debug!(guest_id = %guest_id, "reissued guest session");
        Ok(SessionOutcome::Reissued { guest_id, token })
    }

    /// Validate a presented token without the reissue fallback.
    pub fn validate(&self, presented: &str) -> Option<GuestId> {
        SignedGuestToken::from_string(presented.to_string())
            .validate_hmac(self.secret.as_bytes())
    }

    /// The configured session TTL in days.
    pub fn ttl_days(&self) -> i64 {
        self.ttl_days
    }

    /// The signing secret, for wiring a [`TokenVerifier`].
    ///
    /// [`TokenVerifier`]: crate::types::verification::TokenVerifier
    pub(crate) fn secret_bytes(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> GuestSessionService {
        GuestSessionService::new("test_session_secret_32_bytes_min", 7)
    }

    #[test]
    fn test_establish_mints_live_session() {
        let svc = service();
        let (guest_id, token) = svc.establish().unwrap();

        assert!(!guest_id.is_placeholder());
        assert_eq!(svc.validate(token.as_str()), Some(guest_id));
    }

    #[test]
    fn test_resume_valid_token() {
        let svc = service();
        let (guest_id, token) = svc.establish().unwrap();

        let outcome = svc.resume(token.as_str()).unwrap();
        assert!(outcome.is_resumed());
        assert_eq!(outcome.guest_id(), &guest_id);
    }

    #[test]
    fn test_resume_garbage_reissues() {
        let svc = service();

        let outcome = svc.resume("definitely.not.valid").unwrap();
        match outcome {
            SessionOutcome::Reissued { guest_id, token } => {
                assert!(!guest_id.is_placeholder());
                // The reissued token is itself live
                assert_eq!(svc.validate(token.as_str()), Some(guest_id));
            }
            SessionOutcome::Resumed { .. } => panic!("garbage token must not resume"),
        }
    }

    #[test]
    fn test_resume_expired_token_reissues_new_identity() {
        let svc = service();
        let expired_svc = GuestSessionService::new("test_session_secret_32_bytes_min", -1);
        let (old_id, expired) = expired_svc.establish().unwrap();

        let outcome = svc.resume(expired.as_str()).unwrap();
        assert!(!outcome.is_resumed());
        assert_ne!(outcome.guest_id(), &old_id);
    }

    #[test]
    fn test_resume_foreign_secret_reissues() {
        let svc = service();
        let foreign = GuestSessionService::new("another_secret_from_another_app!!", 7);
        let (_, token) = foreign.establish().unwrap();

        let outcome = svc.resume(token.as_str()).unwrap();
        assert!(!outcome.is_resumed());
    }

    #[test]
    fn test_two_tokens_same_identity() {
        let svc = service();
        let (guest_id, _) = svc.establish().unwrap();

        // Mint a second token for the same identity: both validate to the
        // same logical guest session
        let second =
            create_guest_session_token(&guest_id, "test_session_secret_32_bytes_min", None)
                .unwrap();
        assert_eq!(svc.validate(second.as_str()), Some(guest_id));
    }
}
