use memory_core::MemoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Empty message")]
    EmptyInput,

    #[error("LLM error: {0:#}")]
    Llm(anyhow::Error),

    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
