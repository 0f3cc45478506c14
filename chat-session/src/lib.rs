//! # Chat Session
//!
//! Per-conversation controller. For each user message:
//!
//! 1. recall the nearest past turns from the session's memory,
//! 2. format the last turns of the visible transcript,
//! 3. render the prompt and call the model,
//! 4. append the reply to the transcript and store both turns in memory.
//!
//! [`SessionManager`] gives every session its own store; nothing is shared between them.

pub mod error;
pub mod manager;
pub mod session;
pub mod transcript;

pub use error::{Result, SessionError};
pub use manager::{MemoryFactory, SessionManager};
pub use session::{ChatSession, SessionSettings};
pub use transcript::{ChatTurn, Transcript, TranscriptFormat};
