//! Visible chat transcript of one session and its export formats.

use chrono::{DateTime, Utc};
use memory_core::MemoryRole;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One message shown in the chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: MemoryRole,
    pub content: String,
    pub at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(role: MemoryRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            at: Utc::now(),
        }
    }
}

/// Export format for [`Transcript`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranscriptFormat {
    /// `role: content` lines
    #[default]
    Text,
    /// Pretty-printed JSON array of turns
    Json,
}

impl TranscriptFormat {
    /// Picks JSON for a `.json` path, text otherwise.
    pub fn from_path(path: &std::path::Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => TranscriptFormat::Json,
            _ => TranscriptFormat::Text,
        }
    }
}

/// Ordered list of turns, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: MemoryRole, content: impl Into<String>) {
        self.turns.push(ChatTurn::new(role, content));
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Last `limit` turns formatted for the prompt's "Previous messages" section.
    pub fn history(&self, limit: usize) -> String {
        prompt::format_chat_history(
            self.turns
                .iter()
                .map(|t| (t.role.as_str(), t.content.as_str())),
            limit,
        )
    }

    /// `role: content` per turn, newline-separated.
    pub fn to_text(&self) -> String {
        self.turns
            .iter()
            .map(|t| format!("{}: {}", t.role, t.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render(&self, format: TranscriptFormat) -> Result<String> {
        match format {
            TranscriptFormat::Text => Ok(self.to_text()),
            TranscriptFormat::Json => self.to_json(),
        }
    }
}
