//! Shared test utilities for chat-session integration tests.
//!
//! `ScriptedLlm` replays queued replies and records every prompt it receives;
//! `FailingMemory` errors on every store/retrieve.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use embedding::HashingEmbedding;
use llm_client::LlmClient;
use memory_core::{
    ConversationMemory, MemoryConfig, MemoryContext, MemoryError, MemoryRole, StoreOutcome,
};
use memory_inmemory::VectorMemoryStore;
use prompt::ChatMessage;

pub const DIM: usize = 64;

/// LLM double: pops queued replies (`Err` strings become errors), "ok" when the queue is empty.
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, String>>>,
    seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// User content of the last prompt sent.
    pub fn last_prompt(&self) -> String {
        self.seen
            .lock()
            .unwrap()
            .last()
            .and_then(|m| m.last())
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }

    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.seen.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, messages: Vec<ChatMessage>) -> anyhow::Result<String> {
        self.seen.lock().unwrap().push(messages);
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Ok("ok".to_string()),
        }
    }
}

/// Memory whose store and retrieve always fail with an embedding error.
pub struct FailingMemory;

#[async_trait]
impl ConversationMemory for FailingMemory {
    async fn store(&self, _text: &str, _role: MemoryRole) -> Result<StoreOutcome, MemoryError> {
        Err(MemoryError::Embedding(anyhow::anyhow!("embedder down")))
    }

    async fn retrieve(&self, _query: &str, _k: usize) -> Result<MemoryContext, MemoryError> {
        Err(MemoryError::Embedding(anyhow::anyhow!("embedder down")))
    }

    async fn len(&self) -> usize {
        0
    }

    async fn clear(&self) {}
}

/// A real vector store over the local hashing embedder.
pub fn hashing_store(max_size: usize) -> Arc<VectorMemoryStore> {
    Arc::new(VectorMemoryStore::new(
        Arc::new(HashingEmbedding::new(DIM)),
        MemoryConfig::new(max_size, 0.75).with_dimension(DIM),
    ))
}

/// Text between "Previous messages: " and the "Current question:" section.
pub fn history_section(prompt: &str) -> String {
    let start = prompt
        .find(prompt::SECTION_HISTORY)
        .map(|i| i + prompt::SECTION_HISTORY.len() + 1)
        .unwrap_or(0);
    let end = prompt.find(prompt::SECTION_QUESTION).unwrap_or(prompt.len());
    prompt[start..end].trim().to_string()
}
