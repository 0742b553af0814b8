//! Lead submission to the external CRM.

pub mod client;

pub use client::{CrmClient, CrmError, CrmResponse, Result};
