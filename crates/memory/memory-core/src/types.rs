//! # Core Types
//!
//! This module defines the core types for the conversation memory.
//!
//! ## MemoryRole
//!
//! Who produced a remembered turn: `User` or `Assistant`.
//!
//! ## MemoryRecord
//!
//! One remembered turn: text, role and the embedding vector computed for the text.
//! Records are immutable once created.
//!
//! ## MemoryContext
//!
//! Result of a retrieval. Either the concatenated texts of the nearest records or the
//! `NoRelevantMemory` sentinel. An empty store is a normal state, not an error.
//!
//! ## StoreOutcome
//!
//! What a `store` call did: a plain append, or a compaction that evicted old records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Text rendered for [`MemoryContext::NoRelevantMemory`].
pub const NO_RELEVANT_MEMORY: &str = "No relevant past conversation found.";

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MemoryRole {
    User,
    Assistant,
}

impl MemoryRole {
    /// Lowercase name ("user" / "assistant").
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryRole::User => "user",
            MemoryRole::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MemoryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single remembered conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// The remembered text
    pub text: String,
    /// Who produced the text
    pub role: MemoryRole,
    /// Embedding of `text`; length equals the store's dimension
    pub vector: Vec<f32>,
}

impl MemoryRecord {
    pub fn new(text: impl Into<String>, role: MemoryRole, vector: Vec<f32>) -> Self {
        Self {
            text: text.into(),
            role,
            vector,
        }
    }
}

/// A record returned by a scored retrieval, with its squared L2 distance to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    /// Position of the record in insertion order at query time
    pub position: usize,
    /// Squared Euclidean distance to the query vector (smaller is closer)
    pub distance: f32,
    pub record: MemoryRecord,
}

/// Result of `retrieve`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryContext {
    /// Texts of the nearest records, nearest first, joined by a single space.
    Relevant(String),
    /// Nothing to recall (empty store or no valid neighbours).
    NoRelevantMemory,
}

impl MemoryContext {
    /// Returns true for the `NoRelevantMemory` sentinel.
    pub fn is_empty(&self) -> bool {
        matches!(self, MemoryContext::NoRelevantMemory)
    }

    /// Returns the recalled text, or `None` for the sentinel.
    pub fn as_relevant(&self) -> Option<&str> {
        match self {
            MemoryContext::Relevant(text) => Some(text),
            MemoryContext::NoRelevantMemory => None,
        }
    }
}

impl fmt::Display for MemoryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryContext::Relevant(text) => f.write_str(text),
            MemoryContext::NoRelevantMemory => f.write_str(NO_RELEVANT_MEMORY),
        }
    }
}

/// What a successful `store` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The record was appended; no other record moved.
    Appended,
    /// The store was full: the oldest `evicted` records were dropped, the rest re-indexed,
    /// and the new record appended.
    Compacted { evicted: usize },
}
