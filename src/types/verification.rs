//! Token verification modes for production deployment.
//!
//! ## Purpose
//!
//! This module provides configurable verification strategies for guest
//! session tokens. The goal is to make validation **cheap enough that it's
//! never bypassed**, even when the same cookie arrives on every request of
//! a browsing session.
//!
//! ## Verification Modes
//!
//! | Mode | Use Case | Performance | Security |
//! |------|----------|-------------|----------|
//! | `LocalSecret` | Single-node deployment | ~100μs | Full HMAC verification |
//! | `Cached` | High-throughput services | ~10μs (cache hit) | Full HMAC + LRU cache |
//!
//! ## Cache Design
//!
//! The cache key is `xxh64` of the token text. The cached value records
//! the *signature* outcome plus the embedded time window; the expiry check
//! runs against the clock on every call, so a cache hit can never keep an
//! expired token alive. Invalid results are cached too.

use lru::LruCache;
use parking_lot::RwLock;
use std::num::NonZeroUsize;
use std::sync::Arc;
use xxhash_rust::xxh64::xxh64;

use super::guest::GuestId;
use super::token::SignedGuestToken;
use chrono::Utc;

/// Configuration for the token verification cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_entries: usize,
    /// Whether to enable the cache.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            enabled: true,
        }
    }
}

/// Verification mode for guest session tokens.
#[derive(Debug, Clone)]
pub enum VerificationMode {
    /// Verify every call with the local HMAC secret.
    ///
    /// Best for: single-node deployments, testing, low-latency requirements.
    LocalSecret {
        /// The shared HMAC secret.
        secret: Vec<u8>,
    },

    /// Verify with LRU caching of signature outcomes.
    ///
    /// Best for: services where the same session cookie is validated on
    /// many consecutive requests.
    Cached {
        /// The shared HMAC secret.
        secret: Vec<u8>,
        /// Cache configuration.
        config: CacheConfig,
    },
}

impl VerificationMode {
    /// Create a local secret verification mode.
    pub fn local_secret(secret: Vec<u8>) -> Self {
        Self::LocalSecret { secret }
    }

    /// Create a cached verification mode with default configuration.
    pub fn cached(secret: Vec<u8>) -> Self {
        Self::Cached {
            secret,
            config: CacheConfig::default(),
        }
    }

    /// Create a cached verification mode with custom configuration.
    pub fn cached_with_config(secret: Vec<u8>, config: CacheConfig) -> Self {
        Self::Cached { secret, config }
    }
}

/// Signature outcome retained per token.
///
/// Only signature-derived facts are cached; liveness is re-derived from
/// the clock on every lookup.
#[derive(Debug, Clone)]
struct CachedSignature {
    guest_id: GuestId,
    nbf: i64,
    exp: i64,
}

/// Result of a verification call.
#[derive(Debug, Clone)]
pub struct VerificationResult {
    /// The validated guest identifier, or `None` for any failure.
    pub guest_id: Option<GuestId>,
    /// Whether this result came from cache.
    pub cache_hit: bool,
}

impl VerificationResult {
    /// Whether the token validated.
    pub fn is_valid(&self) -> bool {
        self.guest_id.is_some()
    }
}

/// Token verifier with optional caching.
///
/// Thread-safe and suitable for use in async services: the secret is
/// read-only configuration and the cache is guarded by a `parking_lot`
/// RwLock.
pub struct TokenVerifier {
    mode: VerificationMode,
    cache: Option<Arc<RwLock<LruCache<u64, Option<CachedSignature>>>>>,
}

impl TokenVerifier {
    /// Create a new token verifier with the specified mode.
    pub fn new(mode: VerificationMode) -> Self {
        let cache = match &mode {
            VerificationMode::Cached { config, .. } if config.enabled => {
                let size = NonZeroUsize::new(config.max_entries)
                    .unwrap_or_else(|| NonZeroUsize::new(1000).expect("non-zero"));
                Some(Arc::new(RwLock::new(LruCache::new(size))))
            }
            _ => None,
        };

        Self { mode, cache }
    }

    /// Get the HMAC secret from the verification mode.
    fn secret(&self) -> &[u8] {
        match &self.mode {
            VerificationMode::LocalSecret { secret } => secret,
            VerificationMode::Cached { secret, .. } => secret,
        }
    }

    /// Verify a guest session token.
    pub fn verify(&self, token: &SignedGuestToken) -> VerificationResult {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify against an explicit clock (epoch seconds).
    pub fn verify_at(&self, token: &SignedGuestToken, now: i64) -> VerificationResult {
        let cache_key = xxh64(token.as_str().as_bytes(), 0);

        // Check cache first (if enabled)
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.read().peek(&cache_key) {
                return VerificationResult {
                    guest_id: Self::liveness_check(cached.as_ref(), now),
                    cache_hit: true,
                };
            }
        }

        // Cache miss - perform full HMAC verification
        let signature_outcome = token
            .verified_claims(self.secret())
            .map(|claims| CachedSignature {
                guest_id: claims.guest_id,
                nbf: claims.nbf,
                exp: claims.exp,
            });

        let guest_id = Self::liveness_check(signature_outcome.as_ref(), now);

        // Update cache (if enabled)
        if let Some(cache) = &self.cache {
            cache.write().put(cache_key, signature_outcome);
        }

        VerificationResult {
            guest_id,
            cache_hit: false,
        }
    }

    /// Apply the time-window check to a signature outcome.
    fn liveness_check(cached: Option<&CachedSignature>, now: i64) -> Option<GuestId> {
        let sig = cached?;
        if now < sig.nbf || now >= sig.exp {
            return None;
        }
        Some(sig.guest_id.clone())
    }

    /// Get cache statistics.
    ///
    /// Returns `None` if caching is disabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| {
            let cache = cache.read();
            CacheStats {
                len: cache.len(),
                cap: cache.cap().get(),
            }
        })
    }

    /// Clear the verification cache.
    ///
    /// Does nothing if caching is disabled.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.write().clear();
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    /// Current number of entries in the cache.
    pub len: usize,
    /// Maximum capacity of the cache.
    pub cap: usize,
}
