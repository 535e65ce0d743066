use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{health, route_not_found};
use super::middleware::{failure_from_panic, logging_middleware, respond_to_failures};
use super::openapi::ApiDoc;
use crate::errors::ErrorResponder;
use crate::metrics;

pub fn create_router(responder: Arc<ErrorResponder>) -> Router {
    let routes = Router::new()
        // Health check
        .route("/health", get(health))
        // Metrics endpoint (Prometheus)
        .route("/metrics", get(metrics::metrics_handler))
        // OpenAPI documentation
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    with_failure_handling(routes, responder)
}

/// Put `router` behind the failure responder and the shared middleware stack.
///
/// Unmatched paths fall through to a 404 failure and handler panics are
/// caught, so both reach the responder.
pub fn with_failure_handling(router: Router, responder: Arc<ErrorResponder>) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .fallback(route_not_found)
        // Order matters, outermost last: trace -> cors -> metrics -> logging -> failures -> panics
        .layer(CatchPanicLayer::custom(failure_from_panic))
        .layer(middleware::from_fn_with_state(responder, respond_to_failures))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics::middleware::track_metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
