//! Completion providers backing the chat endpoint.

use std::sync::Arc;
use std::time::Duration;

pub mod ollama;
pub mod openai;
pub mod provider;

pub use provider::{Provider, ProviderError, Result};

use crate::config::{ChatProviderKind, Settings};

/// Timeout for completion requests.
pub const COMPLETION_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the provider selected by the settings.
pub fn create_provider(settings: &Settings) -> Result<Arc<dyn Provider>> {
    let provider: Arc<dyn Provider> = match settings.chat_provider {
        ChatProviderKind::Openai => Arc::new(openai::OpenAiProvider::new(
            settings.openai_api_key.clone(),
            settings.chat_api_url.as_deref(),
            settings.chat_model.as_deref(),
        )?),
        ChatProviderKind::Ollama => Arc::new(ollama::OllamaProvider::new(
            settings.chat_api_url.as_deref(),
            settings.chat_model.as_deref(),
        )?),
    };

    tracing::info!(
        provider = provider.name(),
        model = provider.default_model(),
        "Chat provider ready"
    );
    Ok(provider)
}

fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(COMPLETION_TIMEOUT).build()?)
}
