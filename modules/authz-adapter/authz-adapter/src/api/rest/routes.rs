use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;
use tracing::field::Empty;

use crate::api::rest::handlers;
use crate::domain::service::AuthzAdapterService;

/// Build the adapter's HTTP surface.
///
/// - `GET /check`: authorization decision for nginx `auth_request`
/// - `GET /healthz`: liveness probe, always `ok`
#[must_use]
pub fn router(service: Arc<AuthzAdapterService>) -> Router {
    Router::new()
        .route("/check", get(handlers::check))
        .route("/healthz", get(|| async { "ok" }))
        .layer(Extension(service))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<axum::body::Body>| {
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri().path(),
                        module = "authz_adapter",
                        status = Empty,
                        latency_ms = Empty,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<axum::body::Body>,
                     latency: Duration,
                     span: &tracing::Span| {
                        span.record("status", res.status().as_u16());
                        span.record("latency_ms", latency.as_millis());
                    },
                ),
        )
}
