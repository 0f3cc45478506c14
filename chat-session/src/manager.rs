//! [`SessionManager`]: hands out sessions, each with a store of its own.

use std::collections::HashMap;
use std::sync::Arc;

use llm_client::LlmClient;
use memory_core::ConversationMemory;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::session::{ChatSession, SessionSettings};

/// Builds a fresh, empty memory for a new session.
pub type MemoryFactory = dyn Fn() -> Arc<dyn ConversationMemory> + Send + Sync;

/// Sessions keyed by id. Memory is never shared across sessions.
pub struct SessionManager {
    factory: Arc<MemoryFactory>,
    llm: Arc<dyn LlmClient>,
    settings: SessionSettings,
    sessions: RwLock<HashMap<Uuid, Arc<ChatSession>>>,
}

impl SessionManager {
    pub fn new<F>(factory: F, llm: Arc<dyn LlmClient>, settings: SessionSettings) -> Self
    where
        F: Fn() -> Arc<dyn ConversationMemory> + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
            llm,
            settings,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Opens a new session with an empty memory.
    pub async fn create(&self) -> (Uuid, Arc<ChatSession>) {
        let id = Uuid::new_v4();
        let session = Arc::new(ChatSession::new(
            (self.factory)(),
            self.llm.clone(),
            self.settings.clone(),
        ));
        let mut sessions = self.sessions.write().await;
        sessions.insert(id, session.clone());
        info!(session_id = %id, sessions = sessions.len(), "step: session created");
        (id, session)
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<ChatSession>> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Drops a session and, once no handle remains, its memory. Returns whether it existed.
    pub async fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            info!(session_id = %id, "step: session removed");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
