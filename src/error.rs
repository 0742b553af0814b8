//! Error types for the lead intake service.

use thiserror::Error;

use crate::crm::CrmError;
use crate::providers::ProviderError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CRM error: {0}")]
    Crm(#[from] CrmError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Journal error: {0}")]
    Journal(String),
}
