//! Axum routes for the guest session service.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::session::SessionOutcome;
use crate::types::token::SignedGuestToken;
use crate::DEFAULT_SESSION_TTL_DAYS;

use super::middleware::{metrics_middleware, record_token_verification};
use super::state::ServiceState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response from establishing a new guest session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstablishResponse {
    /// The freshly minted guest identifier.
    pub guest_id: String,
    /// The signed token to store client-side.
    pub token: String,
    /// Session lifetime in days.
    pub ttl_days: i64,
}

/// Request to verify a presented token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    /// The token string to validate.
    pub token: String,
}

/// Response from token verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Whether the token validated.
    pub valid: bool,
    /// The embedded guest identifier, present iff `valid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_id: Option<String>,
    /// Whether the verdict came from the verification cache.
    pub cache_hit: bool,
}

/// Request to resume a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeRequest {
    /// The token presented by the visitor, if any.
    pub token: Option<String>,
}

/// Response from resuming a session.
///
/// Always carries a live identity; `token` is set only when a fresh one
/// was reissued and must replace the visitor's stored token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeResponse {
    /// The live guest identifier.
    pub guest_id: String,
    /// The replacement token, when the session was reissued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Whether the presented token was continued.
    pub resumed: bool,
}

/// Service health response (detailed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub default_ttl_days: i64,
    /// Verification cache occupancy, when caching is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_len: Option<usize>,
}

/// Simple liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
}

/// Readiness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
}

/// Structured error response with correlation ID for tracing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Machine-readable error code.
    pub code: String,
    /// Correlation ID for request tracing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response with code and message.
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            correlation_id: None,
        }
    }

    /// Add a correlation ID to the error.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> axum::response::Response {
        tracing::warn!(
            code = %self.code,
            error = %self.error,
            correlation_id = ?self.correlation_id,
            "Request error"
        );
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Establish a new guest session.
async fn establish_handler(
    State(state): State<Arc<ServiceState>>,
) -> Result<Json<EstablishResponse>, ErrorResponse> {
    let (guest_id, token) = state
        .session
        .establish()
        .map_err(|e| ErrorResponse::new("SESSION_MINT_FAILED", e.to_string()))?;

    Ok(Json(EstablishResponse {
        guest_id: guest_id.to_string(),
        token: token.to_string(),
        ttl_days: state.session.ttl_days(),
    }))
}

/// Validate a presented token.
///
/// Note that the response never says *why* an invalid token failed.
async fn verify_handler(
    State(state): State<Arc<ServiceState>>,
    Json(request): Json<VerifyRequest>,
) -> Json<VerifyResponse> {
    let token = SignedGuestToken::from_string(request.token);
    let result = state.verifier.verify(&token);

    record_token_verification(result.is_valid(), result.cache_hit);

    Json(VerifyResponse {
        valid: result.is_valid(),
        guest_id: result.guest_id.map(|id| id.to_string()),
        cache_hit: result.cache_hit,
    })
}

/// Resume a session, reissuing a fresh one on any validation failure.
async fn resume_handler(
    State(state): State<Arc<ServiceState>>,
    Json(request): Json<ResumeRequest>,
) -> Result<Json<ResumeResponse>, ErrorResponse> {
    let presented = request.token.unwrap_or_default();
    let outcome = state
        .session
        .resume(&presented)
        .map_err(|e| ErrorResponse::new("SESSION_MINT_FAILED", e.to_string()))?;

    record_token_verification(outcome.is_resumed(), false);

    Ok(Json(match outcome {
        SessionOutcome::Resumed { guest_id } => ResumeResponse {
            guest_id: guest_id.to_string(),
            token: None,
            resumed: true,
        },
        SessionOutcome::Reissued { guest_id, token } => ResumeResponse {
            guest_id: guest_id.to_string(),
            token: Some(token.to_string()),
            resumed: false,
        },
    }))
}

/// Health check endpoint (detailed).
async fn health_handler(State(state): State<Arc<ServiceState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        default_ttl_days: DEFAULT_SESSION_TTL_DAYS,
        cache_len: state.verifier.cache_stats().map(|s| s.len),
    })
}

/// Liveness probe.
async fn liveness_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe.
///
/// The kernel has no external dependencies; once the process is up it is
/// ready.
async fn readiness_handler() -> Json<ReadinessResponse> {
    Json(ReadinessResponse { ready: true })
}

/// Build the service router.
pub fn create_router(state: ServiceState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/api/session", post(establish_handler))
        .route("/api/session/verify", post(verify_handler))
        .route("/api/session/resume", post(resume_handler))
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .layer(axum::middleware::from_fn(metrics_middleware))
        .with_state(state)
}
