//! Chat endpoint backed by the completion provider.

use axum::{body::Bytes, extract::State, Json};
use serde_json::{json, Value};

use super::{message_field, parse_object};
use crate::web::error::ApiError;
use crate::web::state::AppState;

/// Forward a message to the completion service and return its reply.
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let data = parse_object(&body).map_err(|_| ApiError::MissingMessage)?;
    let message = message_field(&data, "message").ok_or(ApiError::MissingMessage)?;

    tracing::debug!(provider = state.chat.name(), "Generating chat reply");
    let reply = state.chat.complete(message).await?;

    Ok(Json(json!({ "reply": reply })))
}
