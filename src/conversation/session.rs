//! Per-session conversation records.
//!
//! Each session holds the partial lead a user has dictated so far. Sessions
//! are keyed by an opaque token handed to the client, so concurrent
//! conversations never share a record.

use std::collections::HashMap;

/// Upper bound on live sessions; the least recently active one is evicted.
pub const MAX_SESSIONS: usize = 10_000;

/// The partial lead collected in one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeSession {
    /// Session token
    pub id: String,

    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,

    /// Last activity timestamp
    pub updated_at: i64,
}

impl IntakeSession {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            email: None,
            phone: None,
            updated_at: now_timestamp(),
        }
    }

    /// Forget everything collected so far.
    pub fn reset(&mut self) {
        self.name = None;
        self.email = None;
        self.phone = None;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = now_timestamp();
    }

    /// Nothing collected yet.
    pub fn is_blank(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

fn now_timestamp() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Session manager.
#[derive(Debug)]
pub struct SessionManager {
    sessions: HashMap<String, IntakeSession>,
    max_sessions: usize,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::with_limit(MAX_SESSIONS)
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(max_sessions: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Get a session by token, creating it if unknown.
    pub fn get_or_create(&mut self, id: &str) -> &mut IntakeSession {
        if !self.sessions.contains_key(id) && self.sessions.len() >= self.max_sessions {
            self.evict_oldest();
        }
        self.sessions
            .entry(id.to_string())
            .or_insert_with(|| IntakeSession::new(id))
    }

    pub fn get(&self, id: &str) -> Option<&IntakeSession> {
        self.sessions.get(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<IntakeSession> {
        self.sessions.remove(id)
    }

    /// Put a session back, e.g. after a failed submission.
    pub fn restore(&mut self, session: IntakeSession) {
        if !self.sessions.contains_key(&session.id) && self.sessions.len() >= self.max_sessions {
            self.evict_oldest();
        }
        self.sessions.insert(session.id.clone(), session);
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .sessions
            .values()
            .min_by_key(|session| session.updated_at)
            .map(|session| session.id.clone());
        if let Some(id) = oldest {
            tracing::debug!(session_id = %id, "Evicting conversation session");
            self.sessions.remove(&id);
        }
    }

    /// Drop sessions idle for longer than `max_idle_ms`.
    pub fn cleanup(&mut self, max_idle_ms: i64) -> usize {
        let now = now_timestamp();
        let before = self.sessions.len();
        self.sessions
            .retain(|_id, session| now - session.updated_at <= max_idle_ms);
        before - self.sessions.len()
    }
}
