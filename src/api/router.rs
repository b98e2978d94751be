//! HTTP routing configuration with tracing and request timeouts.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::app::AppState;

use super::handlers::{
    create_doctor_handler, get_doctor_handler, health_check_handler, liveness_handler,
    metrics_handler, openapi_handler, readiness_handler, search_doctors_handler,
};

/// Transport-level request timeout applied when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Create router with the default request timeout
pub fn create_router(app_state: Arc<AppState>) -> Router {
    create_router_with_timeout(app_state, DEFAULT_REQUEST_TIMEOUT)
}

/// Create router with a custom request timeout
pub fn create_router_with_timeout(app_state: Arc<AppState>, request_timeout: Duration) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ));

    let doctor_routes = Router::new()
        .route("/doctor", post(create_doctor_handler))
        .route("/doctor/{id}", get(get_doctor_handler))
        .route("/search/doctors", get(search_doctors_handler));

    let health_routes = Router::new()
        .route("/", get(health_check_handler))
        .route("/live", get(liveness_handler))
        .route("/ready", get(readiness_handler));

    Router::new()
        .merge(doctor_routes)
        .nest("/health", health_routes)
        .route("/metrics", get(metrics_handler))
        .route("/api-docs/openapi.json", get(openapi_handler))
        .layer(middleware)
        .with_state(app_state)
}
