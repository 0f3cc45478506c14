//! [`ChatSession`]: one conversation. Recall from memory, assemble the prompt, call the
//! model, record both sides in the transcript and in memory.

use std::path::Path;
use std::sync::Arc;

use llm_client::LlmClient;
use memory_core::config::DEFAULT_TOP_K;
use memory_core::{ConversationMemory, MemoryContext, MemoryRole, StoreOutcome};
use prompt::{PromptContext, DEFAULT_ASSISTANT_NAME, DEFAULT_HISTORY_TURNS};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{Result, SessionError};
use crate::transcript::{ChatTurn, Transcript, TranscriptFormat};

/// Per-session prompt and recall settings.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub assistant_name: String,
    pub system_prompt: Option<String>,
    /// Neighbours recalled per question.
    pub top_k: usize,
    /// Past turns shown under "Previous messages".
    pub history_turns: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
            system_prompt: None,
            top_k: DEFAULT_TOP_K,
            history_turns: DEFAULT_HISTORY_TURNS,
        }
    }
}

/// One chat conversation with its own memory.
///
/// Memory failures never abort a turn: a failed recall falls back to the no-memory
/// context and a failed store is logged. A failed model call is recorded in the
/// transcript as an apology and returned as [`SessionError::Llm`].
pub struct ChatSession {
    memory: Arc<dyn ConversationMemory>,
    llm: Arc<dyn LlmClient>,
    settings: SessionSettings,
    transcript: Mutex<Transcript>,
}

impl ChatSession {
    pub fn new(
        memory: Arc<dyn ConversationMemory>,
        llm: Arc<dyn LlmClient>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            memory,
            llm,
            settings,
            transcript: Mutex::new(Transcript::new()),
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Answers one user message and returns the assistant reply.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn send(&self, text: &str) -> Result<String> {
        let question = text.trim();
        if question.is_empty() {
            return Err(SessionError::EmptyInput);
        }

        let history = {
            let mut transcript = self.transcript.lock().await;
            let history = transcript.history(self.settings.history_turns);
            transcript.push(MemoryRole::User, question);
            history
        };

        let context = self.recall(question).await;
        let prompt = PromptContext::new(context.to_string(), history, question);
        let messages = prompt.to_messages(
            &self.settings.assistant_name,
            self.settings.system_prompt.as_deref(),
        );

        match self.llm.complete(messages).await {
            Ok(reply) => {
                info!(reply_len = reply.len(), "step: llm reply received");
                self.transcript
                    .lock()
                    .await
                    .push(MemoryRole::Assistant, reply.clone());
                let turns = [
                    (question, MemoryRole::User),
                    (reply.as_str(), MemoryRole::Assistant),
                ];
                for (text, role) in turns {
                    if let Err(e) = self.remember(text, role).await {
                        warn!(error = %e, role = %role, "memory store failed, turn kept");
                    }
                }
                Ok(reply)
            }
            Err(e) => {
                let detail = format!("{:#}", e);
                error!(error = %detail, "llm call failed");
                self.transcript.lock().await.push(
                    MemoryRole::Assistant,
                    format!("Sorry, I encountered an error: {}", detail),
                );
                Err(SessionError::Llm(e))
            }
        }
    }

    /// Recalls context for `question`; any memory error degrades to the sentinel.
    async fn recall(&self, question: &str) -> MemoryContext {
        match self.memory.retrieve(question, self.settings.top_k).await {
            Ok(context) => {
                debug!(context = %context, "step: memory recalled");
                context
            }
            Err(e) => {
                warn!(error = %e, "memory recall failed, continuing without context");
                MemoryContext::NoRelevantMemory
            }
        }
    }

    /// Stores one turn in this session's memory.
    pub async fn remember(&self, text: &str, role: MemoryRole) -> Result<StoreOutcome> {
        Ok(self.memory.store(text, role).await?)
    }

    /// Starts over: empties the transcript and the memory.
    pub async fn clear(&self) {
        self.transcript.lock().await.clear();
        self.memory.clear().await;
        info!("step: session cleared");
    }

    /// Number of items currently held in memory.
    pub async fn memory_len(&self) -> usize {
        self.memory.len().await
    }

    pub async fn transcript(&self) -> Vec<ChatTurn> {
        self.transcript.lock().await.turns().to_vec()
    }

    pub async fn export_text(&self) -> String {
        self.transcript.lock().await.to_text()
    }

    pub async fn export_json(&self) -> Result<String> {
        self.transcript.lock().await.to_json()
    }

    /// Writes the transcript to `path`. An empty transcript is written as an empty file.
    pub async fn save_transcript(&self, path: &Path, format: TranscriptFormat) -> Result<()> {
        let body = self.transcript.lock().await.render(format)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, body).await?;
        info!(path = %path.display(), ?format, "step: transcript saved");
        Ok(())
    }
}
