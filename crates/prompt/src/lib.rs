//! # Prompt
//!
//! Builds the single instruction prompt sent to the chat model for one turn.
//!
//! ## Format
//!
//! - **Identity and instructions**: who the assistant is and how to answer
//! - **Context from memory**: text recalled from the vector memory (or the no-memory sentinel)
//! - **Previous messages**: the last few turns as `ROLE: content` lines
//! - **Current question**: the user's message
//!
//! ## Usage
//!
//! Used by `chat-session` on every turn: recall → [`format_chat_history`] →
//! [`PromptContext::to_messages`] → LLM.
//!
//! ## External interactions
//!
//! - **AI models**: Output is sent to OpenAI-compatible chat APIs.

/// Role of a message, one-to-one with OpenAI Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// System instruction (API `role: "system"`).
    System,
    /// User message (API `role: "user"`).
    User,
    /// Assistant message (API `role: "assistant"`).
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A single chat message, one-to-one with one element of OpenAI `messages` array.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Assistant name used when none is configured.
pub const DEFAULT_ASSISTANT_NAME: &str = "Spark";

/// Number of past turns included under "Previous messages".
pub const DEFAULT_HISTORY_TURNS: usize = 6;

pub const SECTION_CONTEXT: &str = "Context from memory:";
pub const SECTION_HISTORY: &str = "Previous messages:";
pub const SECTION_QUESTION: &str = "Current question:";

/// Formats the last `limit` turns as `ROLE: content` lines (role upper-cased), oldest
/// first, joined by newlines. Returns an empty string when there are no turns.
///
/// Callers pass the history *without* the message currently being answered.
pub fn format_chat_history<'a, I>(turns: I, limit: usize) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let turns: Vec<(&str, &str)> = turns.into_iter().collect();
    let start = turns.len().saturating_sub(limit);
    turns[start..]
        .iter()
        .map(|(role, content)| format!("{}: {}", role.to_uppercase(), content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Inputs for one model call.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptContext {
    /// Recalled memory text, or the no-memory sentinel.
    pub context: String,
    /// Output of [`format_chat_history`].
    pub history: String,
    pub question: String,
}

impl PromptContext {
    pub fn new(
        context: impl Into<String>,
        history: impl Into<String>,
        question: impl Into<String>,
    ) -> Self {
        Self {
            context: context.into(),
            history: history.into(),
            question: question.into(),
        }
    }

    /// Renders the full instruction prompt for `assistant_name`.
    pub fn render(&self, assistant_name: &str) -> String {
        format!(
            "You are {name}, a helpful assistant.\n\
             Respond to the user's query based on the context and recent conversation history.\n\
             Keep your responses concise, helpful, and relevant to the conversation flow.\n\
             If the user asks for jokes, provide a fresh joke each time.\n\
             \n\
             {context_title} {context}\n\
             \n\
             {history_title} {history}\n\
             \n\
             {question_title} {question}",
            name = assistant_name,
            context_title = SECTION_CONTEXT,
            history_title = SECTION_HISTORY,
            question_title = SECTION_QUESTION,
            context = self.context,
            history = self.history,
            question = self.question,
        )
    }

    /// Builds the message list: optional System, then the rendered prompt as one User message.
    pub fn to_messages(&self, assistant_name: &str, system: Option<&str>) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(self.render(assistant_name)));
        messages
    }
}
