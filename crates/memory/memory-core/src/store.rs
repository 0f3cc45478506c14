//! # Conversation Memory
//!
//! The `ConversationMemory` trait is the boundary between the conversation controller
//! and a memory backend. The controller stores every user message and assistant reply
//! and retrieves context before each model call.
//!
//! Implementations must make every call appear atomic: a `retrieve` issued after a
//! `store` returned sees the complete effect of that `store`, and failed calls leave
//! no partial state behind.

use async_trait::async_trait;

use crate::error::MemoryError;
use crate::types::{MemoryContext, MemoryRole, StoreOutcome};

/// Trait for a bounded, similarity-searchable memory of conversation turns.
#[async_trait]
pub trait ConversationMemory: Send + Sync {
    /// Embeds `text` and remembers it, compacting first when the store is full.
    async fn store(&self, text: &str, role: MemoryRole) -> Result<StoreOutcome, MemoryError>;

    /// Returns the texts of the `k` records nearest to `query`, or the
    /// `NoRelevantMemory` sentinel when there is nothing to recall.
    async fn retrieve(&self, query: &str, k: usize) -> Result<MemoryContext, MemoryError>;

    /// Number of records currently held.
    async fn len(&self) -> usize;

    /// Returns true if no records are held.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drops every record.
    async fn clear(&self);
}
