//! API endpoints for leads.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};

use super::{field_text, message_field, parse_object};
use crate::crm::CrmResponse;
use crate::lead::{extract, IdStrategy, LeadCandidate};
use crate::web::error::ApiError;
use crate::web::state::AppState;

const STRUCTURED_FIELDS: [&str; 3] = ["firstnm", "email", "mobile"];

/// Build a lead candidate from a request body.
///
/// Structured fields win; a free-text `message` is only extracted when none
/// of them are present. An explicit `Enq_Id` overrides the id strategy.
pub fn lead_from_body(data: &Map<String, Value>, ids: &IdStrategy) -> LeadCandidate {
    let structured = STRUCTURED_FIELDS.iter().any(|key| data.contains_key(*key));

    let mut lead = match message_field(data, "message") {
        Some(text) if !structured => extract(text, ids),
        _ => LeadCandidate {
            enq_id: ids.next_id(),
            firstnm: data.get("firstnm").map(field_text).unwrap_or_default(),
            email: data.get("email").map(field_text).unwrap_or_default(),
            mobile: data.get("mobile").map(field_text).unwrap_or_default(),
        },
    };

    if let Some(id) = data.get("Enq_Id") {
        lead.enq_id = field_text(id);
    }
    lead
}

fn crm_reply(message: &str, response: CrmResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::OK);
    (
        status,
        Json(json!({ "message": message, "crm_response": response.body })),
    )
        .into_response()
}

/// Validate a lead and forward it to the CRM.
pub async fn add_lead(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let data = parse_object(&body)?;
    if data.is_empty() {
        tracing::error!("Empty request body received");
        return Err(ApiError::NoData);
    }
    tracing::info!(fields = ?data.keys().collect::<Vec<_>>(), "Incoming lead request");
    let logged_body = Value::Object(data.clone());
    tracing::debug!("Lead request body: {}", logged_body);

    let lead = lead_from_body(&data, &state.ids);
    if let Err(rejection) = lead.validate() {
        tracing::warn!(enq_id = %lead.enq_id, "Lead rejected: {:?}", rejection);
        return Err(rejection.into());
    }

    let result = state.crm.add_lead(&lead).await;
    state.journal_submission(&lead, "add_lead", &result).await;
    let response = result?;

    tracing::info!(
        enq_id = %lead.enq_id,
        status = response.status,
        "CRM API response: {}",
        response.body
    );
    Ok(crm_reply("Lead submitted successfully", response))
}

/// Forward a partial update for an existing lead. Fields other than the
/// identifier are passed through without validation.
pub async fn update_lead(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let mut data = parse_object(&body)?;

    let enq_id = data
        .remove("Enq_Id")
        .map(|id| field_text(&id))
        .unwrap_or_default();
    if enq_id.is_empty() {
        tracing::warn!("Update request without Enq_Id");
        return Err(ApiError::MissingFields(vec!["Enq_Id"]));
    }
    if data.is_empty() {
        tracing::warn!(enq_id = %enq_id, "Update request with no fields");
        return Err(ApiError::NoUpdateFields);
    }

    tracing::info!(
        enq_id = %enq_id,
        fields = ?data.keys().collect::<Vec<_>>(),
        "Incoming lead update"
    );

    let response = state.crm.update_lead(&enq_id, &data).await?;
    tracing::info!(enq_id = %enq_id, status = response.status, "CRM update response: {}", response.body);
    Ok(crm_reply("Lead updated successfully", response))
}

/// Answer a CORS preflight for `/add_lead`.
pub async fn preflight(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let allowed = state.settings.allowed_origins();
    let mut response = Json(json!({ "message": "CORS preflight successful" })).into_response();
    let out = response.headers_mut();

    if allowed.is_empty() {
        out.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
    } else if let Some(origin) = headers
        .get(header::ORIGIN)
        .filter(|origin| allowed.iter().any(|a| a.as_bytes() == origin.as_bytes()))
    {
        out.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        out.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        out.insert(header::VARY, HeaderValue::from_static("origin"));
    }

    out.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    out.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_structured_fields_default_to_empty() {
        let lead = lead_from_body(
            &body(json!({"firstnm": " Rahul ", "mobile": 9876543210u64})),
            &IdStrategy::default(),
        );
        assert_eq!(lead.enq_id, "12345");
        assert_eq!(lead.firstnm, "Rahul");
        assert_eq!(lead.email, "");
        assert_eq!(lead.mobile, "9876543210");
    }

    #[test]
    fn test_free_text_message_is_extracted() {
        let lead = lead_from_body(
            &body(json!({"message": "I am Rahul, rahul@example.com, 9876543210"})),
            &IdStrategy::default(),
        );
        assert_eq!(lead.firstnm, "Rahul");
        assert_eq!(lead.email, "rahul@example.com");
        assert_eq!(lead.mobile, "9876543210");
    }

    #[test]
    fn test_structured_fields_win_over_message() {
        let lead = lead_from_body(
            &body(json!({"message": "I am Rahul", "firstnm": "Priya"})),
            &IdStrategy::default(),
        );
        assert_eq!(lead.firstnm, "Priya");
    }

    #[test]
    fn test_explicit_id_wins() {
        let lead = lead_from_body(&body(json!({"Enq_Id": "E-9"})), &IdStrategy::Generated);
        assert_eq!(lead.enq_id, "E-9");

        let lead = lead_from_body(&body(json!({"Enq_Id": ""})), &IdStrategy::default());
        assert_eq!(lead.missing_fields()[0], "Enq_Id");
    }
}
