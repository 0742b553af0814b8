//! HTTP client for the CRM add/update endpoints.
//!
//! Each call is a single attempt bounded by the client timeout. A response
//! with an error status and a request that never got a response are kept
//! apart, because the route layer answers them differently.

use reqwest::{Client, RequestBuilder, Url};
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

use crate::config::Settings;
use crate::lead::LeadCandidate;

#[derive(Error, Debug)]
pub enum CrmError {
    /// The CRM answered with a non-success status.
    #[error("CRM returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// No response: connection refused, DNS failure, timeout.
    #[error("{0}")]
    Unavailable(String),

    #[error("Invalid CRM client configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CrmError>;

/// A successful CRM response, passed back to the caller verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct CrmResponse {
    pub status: u16,
    /// Parsed JSON body, or the raw text as a JSON string.
    pub body: Value,
}

#[derive(Clone)]
pub struct CrmClient {
    client: Client,
    add_url: Url,
    update_url: Url,
}

impl CrmClient {
    pub fn new(add_url: &str, update_url: &str, timeout: Duration) -> Result<Self> {
        let add_url = Url::parse(add_url)
            .map_err(|e| CrmError::Config(format!("add URL '{}': {}", add_url, e)))?;
        let update_url = Url::parse(update_url)
            .map_err(|e| CrmError::Config(format!("update URL '{}': {}", update_url, e)))?;
        if update_url.cannot_be_a_base() {
            return Err(CrmError::Config(format!(
                "update URL '{}' cannot take a path segment",
                update_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CrmError::Config(e.to_string()))?;

        Ok(Self {
            client,
            add_url,
            update_url,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            &settings.crm_api_url,
            &settings.crm_update_api_url,
            Duration::from_secs(settings.crm_timeout_secs),
        )
    }

    /// POST a validated lead to the add endpoint.
    pub async fn add_lead(&self, lead: &LeadCandidate) -> Result<CrmResponse> {
        tracing::debug!(enq_id = %lead.enq_id, url = %self.add_url, "Submitting lead to CRM");
        self.send(self.client.post(self.add_url.clone()).json(lead))
            .await
    }

    /// PUT a partial update to `<update_url>/<enq_id>`.
    pub async fn update_lead(&self, enq_id: &str, fields: &Map<String, Value>) -> Result<CrmResponse> {
        let url = self.update_url_for(enq_id);
        tracing::debug!(enq_id, url = %url, "Updating lead in CRM");
        self.send(self.client.put(url).json(fields)).await
    }

    fn update_url_for(&self, enq_id: &str) -> Url {
        let mut url = self.update_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(enq_id);
        }
        url
    }

    async fn send(&self, request: RequestBuilder) -> Result<CrmResponse> {
        let response = request
            .send()
            .await
            .map_err(|e| CrmError::Unavailable(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                tracing::warn!("Could not read CRM error body: {}", e);
                String::new()
            });
            return Err(CrmError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| CrmError::Unavailable(describe(&e)))?;

        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Ok(CrmResponse {
            status: status.as_u16(),
            body,
        })
    }
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("CRM request timed out: {}", err)
    } else if err.is_connect() {
        format!("Could not connect to CRM: {}", err)
    } else {
        format!("CRM request failed: {}", err)
    }
}
