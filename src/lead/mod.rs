//! Lead candidates: the record extracted from a request, its validation and
//! the identifier assigned to it before it is forwarded to the CRM.

pub mod extractor;
pub mod validator;

use serde::{Deserialize, Serialize};

pub use extractor::{extract, extract_email, extract_name, extract_phone};
pub use validator::{validate_email, validate_phone};

/// Wire names of the lead fields, in the order they are reported missing.
pub const REQUIRED_FIELDS: [&str; 4] = ["Enq_Id", "firstnm", "email", "mobile"];

/// A name/email/phone/identifier record awaiting validation and forwarding.
///
/// Serializes with the CRM's field names.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct LeadCandidate {
    #[serde(rename = "Enq_Id")]
    pub enq_id: String,
    pub firstnm: String,
    pub email: String,
    pub mobile: String,
}

impl LeadCandidate {
    /// Wire names of the required fields that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let values = [&self.enq_id, &self.firstnm, &self.email, &self.mobile];
        REQUIRED_FIELDS
            .iter()
            .zip(values)
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect()
    }

    /// Check presence and field formats, in that order.
    pub fn validate(&self) -> Result<(), LeadRejection> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(LeadRejection::Missing(missing));
        }
        if !validate_email(&self.email) {
            return Err(LeadRejection::InvalidEmail);
        }
        if !validate_phone(&self.mobile) {
            return Err(LeadRejection::InvalidPhone);
        }
        Ok(())
    }
}

/// Why a lead candidate was not forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadRejection {
    Missing(Vec<&'static str>),
    InvalidEmail,
    InvalidPhone,
}

/// How a lead gets its `Enq_Id` when the request does not carry one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdStrategy {
    /// Always the same placeholder; the CRM assigns the real identifier.
    Fixed(String),
    /// A fresh UUID v4 per lead.
    Generated,
}

impl IdStrategy {
    pub fn next_id(&self) -> String {
        match self {
            IdStrategy::Fixed(id) => id.clone(),
            IdStrategy::Generated => uuid::Uuid::new_v4().to_string(),
        }
    }
}

impl Default for IdStrategy {
    fn default() -> Self {
        IdStrategy::Fixed("12345".to_string())
    }
}
