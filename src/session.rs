//! In-memory session store
//!
//! Sessions are created lazily on first message and live for the life of the
//! process. Each record sits behind its own async mutex so one request's
//! transition (including any generative call) runs to completion before the
//! next request for the same session starts. Different sessions never wait
//! on each other beyond the brief map lookup.

use crate::state_machine::SessionRecord;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Shared handle to one session's record
pub type SessionHandle = Arc<Mutex<SessionRecord>>;

/// Map of session id to record
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the session for `id`, creating a fresh one on first access.
    /// The first writer wins if two requests race to create the same id.
    pub async fn get_or_create(&self, id: &str) -> SessionHandle {
        {
            let sessions = self.sessions.read().await;
            if let Some(handle) = sessions.get(id) {
                return handle.clone();
            }
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session_id = %id, "Creating session");
                Arc::new(Mutex::new(SessionRecord::new()))
            })
            .clone()
    }

    /// Copy of a session's current record, if it exists
    #[cfg(test)]
    pub async fn snapshot(&self, id: &str) -> Option<SessionRecord> {
        let handle = self.sessions.read().await.get(id).cloned()?;
        let record = handle.lock().await;
        Some(record.clone())
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
