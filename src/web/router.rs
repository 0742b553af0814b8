//! Route definitions for the web server.

use std::any::Any;

use axum::{
    http::{header, HeaderValue, Method},
    response::Response,
    routing::{get, post, put},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::api;
use super::error::internal_error;
use super::state::AppState;

/// Request bodies larger than this are rejected with 413.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// CORS for the configured origins; an empty list allows any origin.
pub fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::OPTIONS];

    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(AnyOrigin)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE]);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    tracing::info!("CORS configured with {} origins", parsed.len());
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(methods)
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Turn a handler panic into a generic 500, keeping the detail in the log.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!("Unhandled error in request handler: {}", detail);
    internal_error()
}

/// Create the full app router.
pub fn create_app_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.settings.allowed_origins());

    Router::new()
        .route("/", get(api::home))
        .route("/health", get(api::health_check))
        // The explicit OPTIONS handler is added after the CORS layer so it
        // answers preflights itself.
        .route(
            "/add_lead",
            post(api::add_lead).layer(cors.clone()).options(api::preflight),
        )
        .route("/update_lead", put(api::update_lead).layer(cors.clone()))
        .route("/chat", post(api::chat).layer(cors.clone()))
        .route("/conversation", post(api::converse).layer(cors))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
