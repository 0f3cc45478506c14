//! # Memory Core
//!
//! Core types, errors and traits for the bounded conversation memory.
//! Used by the `memory-inmemory` crate (the vector store) and by `chat-session`.
//!
//! ## Modules
//!
//! - [`types`] - MemoryRecord, MemoryRole, MemoryContext, StoreOutcome
//! - [`store`] - ConversationMemory trait
//! - [`config`] - MemoryConfig and its env loader
//! - [`error`] - MemoryError

pub mod config;
pub mod error;
pub mod store;
pub mod types;

pub use config::{EnvMemoryConfig, MemoryConfig};
pub use error::MemoryError;
pub use store::ConversationMemory;
pub use types::*;
