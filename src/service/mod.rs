//! Guest Session REST Service
//!
//! Exposes the session kernel as a REST API for the hosting application's
//! HTTP layer (which owns cookies and headers; this service only mints and
//! validates tokens).
//!
//! ## Endpoints
//!
//! - `POST /api/session` - Establish a new guest session
//! - `POST /api/session/verify` - Validate a presented token
//! - `POST /api/session/resume` - Resume a session or reissue a fresh one
//! - `GET /health` - Detailed service health check
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe

pub mod middleware;
pub mod routes;
pub mod state;

pub use middleware::{metrics_middleware, record_token_verification};
pub use routes::create_router;
pub use state::ServiceState;
