//! SQLite journal of leads forwarded to the CRM.
//!
//! The journal is a local audit trail, not a system of record: failures
//! to write it are logged by callers and never change an HTTP response.

use rusqlite::{params, Connection};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::lead::LeadCandidate;

/// One forwarded lead and what the CRM made of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalEntry {
    pub ts: i64,
    pub enq_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Endpoint that produced the lead (`add_lead`, `conversation`).
    pub source: String,
    /// `submitted:<status>`, `rejected:<status>` or `unavailable`.
    pub outcome: String,
}

impl JournalEntry {
    pub fn new(lead: &LeadCandidate, source: &str, outcome: impl Into<String>) -> Self {
        Self {
            ts: chrono::Utc::now().timestamp_millis(),
            enq_id: lead.enq_id.clone(),
            name: lead.firstnm.clone(),
            email: lead.email.clone(),
            phone: lead.mobile.clone(),
            source: source.to_string(),
            outcome: outcome.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LeadJournal {
    path: PathBuf,
}

impl LeadJournal {
    /// Open the journal, creating the file and schema if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let journal = Self {
            path: path.as_ref().to_path_buf(),
        };
        journal.connect()?;
        tracing::info!("Lead journal at {}", journal.path.display());
        Ok(journal)
    }

    fn connect(&self) -> Result<Connection, Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&self.path)
            .map_err(|e| Error::Journal(format!("sqlite open: {}", e)))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS leads (
                id TEXT PRIMARY KEY,
                ts INTEGER NOT NULL,
                enq_id TEXT NOT NULL,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT NOT NULL,
                source TEXT NOT NULL,
                outcome TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_leads_ts ON leads(ts);
            "#,
        )
        .map_err(|e| Error::Journal(format!("sqlite init: {}", e)))?;
        Ok(conn)
    }

    pub fn record(&self, entry: &JournalEntry) -> Result<(), Error> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO leads (id, ts, enq_id, name, email, phone, source, outcome) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                uuid::Uuid::new_v4().to_string(),
                entry.ts,
                entry.enq_id,
                entry.name,
                entry.email,
                entry.phone,
                entry.source,
                entry.outcome
            ],
        )
        .map_err(|e| Error::Journal(format!("sqlite insert lead: {}", e)))?;
        Ok(())
    }

    /// Most recent entries first.
    pub fn recent(&self, limit: usize) -> Result<Vec<JournalEntry>, Error> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(
                "SELECT ts, enq_id, name, email, phone, source, outcome FROM leads ORDER BY ts DESC, rowid DESC LIMIT ?1",
            )
            .map_err(|e| Error::Journal(format!("sqlite prepare recent: {}", e)))?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok(JournalEntry {
                    ts: row.get(0)?,
                    enq_id: row.get(1)?,
                    name: row.get(2)?,
                    email: row.get(3)?,
                    phone: row.get(4)?,
                    source: row.get(5)?,
                    outcome: row.get(6)?,
                })
            })
            .map_err(|e| Error::Journal(format!("sqlite query recent: {}", e)))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| Error::Journal(format!("sqlite read recent: {}", e)))
    }

    /// Record off the async runtime; errors are logged, not returned.
    pub async fn record_in_background(&self, entry: JournalEntry) {
        let journal = self.clone();
        let result = tokio::task::spawn_blocking(move || journal.record(&entry)).await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Failed to journal lead: {}", e),
            Err(e) => tracing::warn!("Lead journal task failed: {}", e),
        }
    }
}
