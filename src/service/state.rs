//! Service state management.
//!
//! Contains the session service and the shared cached verifier.

use std::sync::Arc;

use crate::session::GuestSessionService;
use crate::types::verification::{TokenVerifier, VerificationMode};

/// Shared service state.
///
/// The secret is read-only configuration shared across all validations;
/// it is never mutated at runtime, so no synchronization discipline is
/// needed around it. The verifier's LRU cache carries its own lock.
pub struct ServiceState {
    /// Stateless session mint/resume logic.
    pub session: GuestSessionService,
    /// Cached verifier for the hot validate path.
    pub verifier: Arc<TokenVerifier>,
}

impl ServiceState {
    /// Create new service state around a session service.
    pub fn new(session: GuestSessionService) -> Self {
        let verifier = TokenVerifier::new(VerificationMode::cached(
            session.secret_bytes().to_vec(),
        ));
        Self {
            session,
            verifier: Arc::new(verifier),
        }
    }

    /// Create service state from environment variables.
    ///
    /// Reads `GUEST_SESSION_HMAC_SECRET`; falls back to a development
    /// secret if not set.
    pub fn from_env() -> Self {
        Self::new(GuestSessionService::from_env())
    }
}

impl Clone for ServiceState {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            verifier: Arc::clone(&self.verifier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_shares_one_verifier_cache() {
        let state = ServiceState::new(GuestSessionService::new(
            "test_session_secret_32_bytes_min",
            7,
        ));
        let cloned = state.clone();

        let (_, token) = state.session.establish().unwrap();
        state.verifier.verify(&token);

        // The clone sees the warmed cache
        let result = cloned.verifier.verify(&token);
        assert!(result.cache_hit);
    }
}
