use thiserror::Error;

/// Errors returned by a [`ConversationMemory`](crate::ConversationMemory).
///
/// Every error leaves the store exactly as it was before the failed call.
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Refusing to store empty text")]
    EmptyText,

    #[error("Retrieval needs k >= 1")]
    InvalidTopK,

    #[error("Embedding failed: {0:#}")]
    Embedding(anyhow::Error),

    #[error("Embedding timed out after {timeout:?}")]
    EmbeddingTimeout { timeout: std::time::Duration },

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl MemoryError {
    /// True for errors caused by the embedding backend (failure or timeout).
    pub fn is_embedding_failure(&self) -> bool {
        matches!(
            self,
            MemoryError::Embedding(_) | MemoryError::EmbeddingTimeout { .. }
        )
    }
}
