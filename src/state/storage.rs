//! Session storage implementation
//!
//! This module keeps conversation sessions in memory. Each conversation has its
//! own async mutex so events for one conversation are applied one at a time
//! while different conversations proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;
use crate::models::ConversationId;
use super::session::Session;

/// In-memory session store
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<ConversationId, Arc<Mutex<Session>>>>,
}

/// Exclusive access to one conversation's session
pub type SessionGuard = OwnedMutexGuard<Session>;

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the slot for a conversation, creating it on first use
    async fn slot(&self, conversation_id: ConversationId) -> Arc<Mutex<Session>> {
        if let Some(slot) = self.sessions.read().await.get(&conversation_id) {
            return Arc::clone(slot);
        }

        let mut sessions = self.sessions.write().await;
        let slot = sessions.entry(conversation_id).or_insert_with(|| {
            debug!(conversation_id = conversation_id.0, "Creating session");
            Arc::new(Mutex::new(Session::new()))
        });
        Arc::clone(slot)
    }

    /// Lock a conversation's session for the duration of one transition
    pub async fn acquire(&self, conversation_id: ConversationId) -> SessionGuard {
        self.slot(conversation_id).await.lock_owned().await
    }

    /// Snapshot of a conversation's session; a fresh one if none exists
    pub async fn get(&self, conversation_id: ConversationId) -> Session {
        let slot = self.sessions.read().await.get(&conversation_id).cloned();
        match slot {
            Some(slot) => slot.lock().await.clone(),
            None => Session::new(),
        }
    }

    /// Replace a conversation's session
    pub async fn put(&self, conversation_id: ConversationId, session: Session) {
        *self.acquire(conversation_id).await = session;
    }

    /// Reset a conversation to the initial state
    pub async fn clear(&self, conversation_id: ConversationId) {
        self.acquire(conversation_id).await.finish();
        self.evict_idle(conversation_id).await;
        debug!(conversation_id = conversation_id.0, "Cleared session");
    }

    /// Drop a conversation's slot once it holds nothing but a fresh session
    ///
    /// A slot that is locked or handed out to another task stays.
    pub async fn evict_idle(&self, conversation_id: ConversationId) -> bool {
        let mut sessions = self.sessions.write().await;
        let Some(slot) = sessions.get(&conversation_id) else {
            return false;
        };
        if Arc::strong_count(slot) > 1 {
            return false;
        }

        let idle = match slot.try_lock() {
            Ok(session) => *session == Session::default(),
            Err(_) => false,
        };
        if idle {
            sessions.remove(&conversation_id);
            debug!(conversation_id = conversation_id.0, "Evicted idle session");
        }
        idle
    }

    /// Number of conversations currently holding a session
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
