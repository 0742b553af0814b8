//! Lead intake library root.

pub mod cli;
pub mod config;
pub mod conversation;
pub mod crm;
pub mod error;
pub mod journal;
pub mod lead;
pub mod logging;
pub mod providers;
pub mod web;

pub use cli::Commands;
pub use config::Settings;
pub use crm::{CrmClient, CrmError, CrmResponse};
pub use error::{Error, Result};
pub use lead::{extract, validate_email, validate_phone, IdStrategy, LeadCandidate};
pub use providers::Provider;
pub use web::{create_app_router, run_server, AppState};
