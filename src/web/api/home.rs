//! Service status endpoints.

use axum::Json;
use serde_json::{json, Value};

/// Status and version info.
pub async fn home() -> Json<Value> {
    Json(json!({
        "status": "active",
        "message": "Lead intake API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "documentation": "/docs",
    }))
}

/// Health check endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}
