//! Mapping of request failures to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::crm::CrmError;
use crate::lead::LeadRejection;
use crate::providers::ProviderError;

/// A request that ended in an error response.
#[derive(Debug)]
pub enum ApiError {
    /// Body missing, not JSON, or an empty object.
    NoData,
    MissingFields(Vec<&'static str>),
    InvalidEmail,
    InvalidPhone,
    NoUpdateFields,
    MissingMessage,
    Crm(CrmError),
    Chat(ProviderError),
    /// Anything unexpected. The detail is logged, never returned.
    Internal(String),
}

impl From<LeadRejection> for ApiError {
    fn from(rejection: LeadRejection) -> Self {
        match rejection {
            LeadRejection::Missing(fields) => ApiError::MissingFields(fields),
            LeadRejection::InvalidEmail => ApiError::InvalidEmail,
            LeadRejection::InvalidPhone => ApiError::InvalidPhone,
        }
    }
}

impl From<CrmError> for ApiError {
    fn from(err: CrmError) -> Self {
        ApiError::Crm(err)
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        ApiError::Chat(err)
    }
}

/// Generic 500 body.
pub fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NoData => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid request. No data provided" }),
            ),
            ApiError::MissingFields(missing) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Missing required fields", "missing": missing }),
            ),
            ApiError::InvalidEmail => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid email format" }),
            ),
            ApiError::InvalidPhone => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid phone number" }),
            ),
            ApiError::NoUpdateFields => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "No fields provided to update" }),
            ),
            ApiError::MissingMessage => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Message is required" }),
            ),
            ApiError::Crm(CrmError::Upstream { status, body }) => {
                tracing::error!("CRM API HTTP error {}: {}", status, body);
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (
                    status,
                    json!({ "error": "CRM API returned an error", "details": body }),
                )
            }
            ApiError::Crm(CrmError::Unavailable(detail)) => {
                tracing::error!("CRM API connection error: {}", detail);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({ "error": "Failed to connect to CRM system", "details": detail }),
                )
            }
            ApiError::Crm(err @ CrmError::Config(_)) => {
                tracing::error!("CRM client error: {}", err);
                return internal_error();
            }
            ApiError::Chat(err) => {
                tracing::error!("Chat completion failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Failed to generate a reply" }),
                )
            }
            ApiError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                return internal_error();
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::NoData.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(LeadRejection::InvalidPhone).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Crm(CrmError::Upstream {
                status: 422,
                body: "bad".to_string()
            })
            .into_response()
            .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Crm(CrmError::Unavailable("refused".to_string()))
                .into_response()
                .status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::Internal("boom".to_string()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_out_of_range_upstream_status() {
        let response = ApiError::Crm(CrmError::Upstream {
            status: 1000,
            body: String::new(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
