use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

#[derive(Debug, Clone, Copy)]
pub(crate) struct HttpLimits {
    pub(crate) body_limit_bytes: usize,
    pub(crate) concurrency_limit: usize,
    pub(crate) request_timeout: Duration,
}

/// Timeouts answer `408`, oversized bodies answer `413`.
pub(crate) fn apply_limits(router: Router, limits: HttpLimits) -> Router {
    router
        .layer(RequestBodyLimitLayer::new(limits.body_limit_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            limits.request_timeout,
        ))
        .layer(ConcurrencyLimitLayer::new(limits.concurrency_limit))
}
