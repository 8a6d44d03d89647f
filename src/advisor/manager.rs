//! Session manager
//!
//! Each simulation session gets its own `Advisor`; nothing is shared between
//! sessions.

use crate::advisor::config::AdvisorError;
use crate::advisor::engine::Advisor;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// An advisor bound to a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session ID
    pub id: String,
    /// Optional human-readable label
    pub label: Option<String>,
    /// The session's advisor
    pub advisor: Advisor,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session with a fresh advisor
    pub fn new(label: Option<String>) -> Self {
        let now = Utc::now();
        let nonce: u64 = rand::thread_rng().gen();

        // Generate unique ID from label, time and a random nonce
        let id_data = format!(
            "{}{}{}",
            label.as_deref().unwrap_or(""),
            now.timestamp_nanos_opt().unwrap_or(0),
            nonce
        );
        let id = hex::encode(&Sha256::digest(id_data.as_bytes())[..16]);

        Self {
            id,
            label,
            advisor: Advisor::new(),
            created_at: now,
        }
    }
}

/// Manager for independent advisor sessions
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionManager {
    /// Sessions by ID
    sessions: HashMap<String, Session>,
}

impl SessionManager {
    /// Create a new empty manager
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Start a new session
    pub fn create_session(&mut self, label: Option<String>) -> &Session {
        let session = Session::new(label);
        let id = session.id.clone();
        log::info!("Created advisor session {}", id);
        self.sessions.entry(id).or_insert(session)
    }

    /// Get a session by ID
    pub fn get(&self, id: &str) -> Result<&Session, AdvisorError> {
        self.sessions
            .get(id)
            .ok_or_else(|| AdvisorError::SessionNotFound(id.to_string()))
    }

    /// Get a session's advisor by ID
    pub fn advisor(&self, id: &str) -> Result<&Advisor, AdvisorError> {
        self.get(id).map(|s| &s.advisor)
    }

    /// Get a mutable reference to a session's advisor
    pub fn advisor_mut(&mut self, id: &str) -> Result<&mut Advisor, AdvisorError> {
        self.sessions
            .get_mut(id)
            .map(|s| &mut s.advisor)
            .ok_or_else(|| AdvisorError::SessionNotFound(id.to_string()))
    }

    /// List all sessions, oldest first
    pub fn list(&self) -> Vec<&Session> {
        let mut sessions: Vec<&Session> = self.sessions.values().collect();
        sessions.sort_by_key(|s| s.created_at);
        sessions
    }

    /// Remove a session
    pub fn remove(&mut self, id: &str) -> Result<Session, AdvisorError> {
        let session = self
            .sessions
            .remove(id)
            .ok_or_else(|| AdvisorError::SessionNotFound(id.to_string()))?;
        log::info!("Removed advisor session {}", id);
        Ok(session)
    }

    /// Get session count
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
