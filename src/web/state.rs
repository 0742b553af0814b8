//! Application state shared by all handlers.

use std::sync::{Arc, Mutex};

use crate::config::Settings;
use crate::conversation::SessionManager;
use crate::crm::{self, CrmClient, CrmError, CrmResponse};
use crate::error::Result;
use crate::journal::{JournalEntry, LeadJournal};
use crate::lead::{IdStrategy, LeadCandidate};
use crate::providers::{self, Provider};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub crm: CrmClient,
    pub chat: Arc<dyn Provider>,
    /// Conversation records, keyed by session token
    pub sessions: Arc<Mutex<SessionManager>>,
    pub journal: Option<LeadJournal>,
    pub ids: IdStrategy,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self> {
        let crm = CrmClient::from_settings(&settings)?;
        let chat = providers::create_provider(&settings)?;
        let journal = settings
            .leads_db_path
            .as_ref()
            .map(LeadJournal::open)
            .transpose()?;

        Ok(Self {
            ids: settings.id_strategy(),
            settings: Arc::new(settings),
            crm,
            chat,
            sessions: Arc::new(Mutex::new(SessionManager::new())),
            journal,
        })
    }

    /// Record a CRM submission in the journal, if one is configured.
    pub async fn journal_submission(
        &self,
        lead: &LeadCandidate,
        source: &str,
        result: &crm::Result<CrmResponse>,
    ) {
        let Some(journal) = &self.journal else {
            return;
        };
        let outcome = match result {
            Ok(response) => format!("submitted:{}", response.status),
            Err(CrmError::Upstream { status, .. }) => format!("rejected:{}", status),
            Err(CrmError::Unavailable(_)) => "unavailable".to_string(),
            Err(CrmError::Config(_)) => "error".to_string(),
        };
        journal
            .record_in_background(JournalEntry::new(lead, source, outcome))
            .await;
    }

    pub fn session_idle_ms(&self) -> i64 {
        (self.settings.session_idle_secs as i64).saturating_mul(1000)
    }
}
