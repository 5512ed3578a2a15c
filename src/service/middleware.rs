//! Service middleware for metrics and request tracking.
//!
//! ## Metrics Exposed
//!
//! - `guest_session_requests_total` - Counter of total requests by path, method, status
//! - `guest_session_request_duration_seconds` - Histogram of request latency
//! - `guest_session_token_verifications_total` - Counter of token verifications

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::info;

/// Metrics middleware that records request counts and latency.
///
/// Uses tracing for now - can be upgraded to prometheus metrics later.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = normalize_path(request.uri().path());

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status().as_u16();

    info!(
        target: "guest_session::metrics",
        metric_type = "request",
        path = %path,
        method = %method,
        status = status,
        latency_ms = latency.as_millis() as u64,
        "request_metric"
    );

    response
}

/// Normalize path for metrics to avoid high cardinality.
///
/// Replaces UUIDs and other dynamic path segments with placeholders.
fn normalize_path(path: &str) -> String {
    let uuid_regex = regex_lite::Regex::new(
        r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}",
    )
    .expect("static pattern");

    uuid_regex.replace_all(path, ":id").to_string()
}

/// Record token verification metrics.
pub fn record_token_verification(valid: bool, cache_hit: bool) {
    let result = if valid { "valid" } else { "invalid" };
    info!(
        target: "guest_session::metrics",
        metric_type = "token_verification",
        result = result,
        cache_hit = cache_hit,
        "token_verification_metric"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_replaces_uuid() {
        let path = "/api/session/550e8400-e29b-41d4-a716-446655440000";
        let normalized = normalize_path(path);
        assert_eq!(normalized, "/api/session/:id");
    }

    #[test]
    fn test_normalize_path_preserves_regular_path() {
        let path = "/health/ready";
        let normalized = normalize_path(path);
        assert_eq!(normalized, "/health/ready");
    }
}
