//! Conversational intake endpoint.

use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;

use super::{message_field, parse_object};
use crate::conversation::{advance, intake, Turn};
use crate::web::error::ApiError;
use crate::web::state::AppState;

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub session_id: String,
    pub reply: String,
    pub lead_submitted: bool,
}

/// Take one user message in a lead intake conversation.
///
/// Clients echo back the returned `session_id`; a request without one
/// starts a new session.
pub async fn converse(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ConversationResponse>, ApiError> {
    let data = parse_object(&body).map_err(|_| ApiError::MissingMessage)?;
    let message = message_field(&data, "message").ok_or(ApiError::MissingMessage)?;
    let session_id = message_field(&data, "session_id")
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    // The lock is released before any network call. A session whose lead is
    // being submitted is taken out of the manager first, so a second turn on
    // the same token cannot submit it again.
    let (turn, pending) = {
        let mut sessions = state
            .sessions
            .lock()
            .map_err(|e| ApiError::Internal(format!("session lock poisoned: {}", e)))?;
        let expired = sessions.cleanup(state.session_idle_ms());
        if expired > 0 {
            tracing::debug!("Dropped {} idle conversation sessions", expired);
        }

        let session = sessions.get_or_create(&session_id);
        let turn = advance(session, message, &state.ids);
        let blank = session.is_blank();

        let pending = match turn {
            Turn::Submit(_) => sessions.remove(&session_id),
            Turn::Reply(_) if blank => {
                sessions.remove(&session_id);
                None
            }
            Turn::Reply(_) => None,
        };
        (turn, pending)
    };

    let (reply, lead_submitted) = match turn {
        Turn::Reply(reply) => (reply, false),
        Turn::Submit(lead) => {
            let result = state.crm.add_lead(&lead).await;
            state.journal_submission(&lead, "conversation", &result).await;

            match result {
                Ok(response) => {
                    tracing::info!(
                        session_id = %session_id,
                        status = response.status,
                        "Conversation lead submitted"
                    );
                    (intake::REPLY_ADDED.to_string(), true)
                }
                Err(e) => {
                    tracing::error!(session_id = %session_id, "Conversation lead not submitted: {}", e);
                    // Keep what was collected so the user can retry.
                    if let (Some(session), Ok(mut sessions)) = (pending, state.sessions.lock()) {
                        sessions.restore(session);
                    }
                    (intake::REPLY_SUBMIT_FAILED.to_string(), false)
                }
            }
        }
    };

    Ok(Json(ConversationResponse {
        session_id,
        reply,
        lead_submitted,
    }))
}
