//! # Text Embeddings
//!
//! This crate defines the embedding service interface for generating text embeddings,
//! plus two providers that need no network:
//!
//! - [`HashingEmbedding`] - deterministic feature-hashing embedder for offline use
//! - [`CachedEmbedding`] - memoizing wrapper around any other service
//!
//! The OpenAI-compatible provider lives in the `openai-embedding` crate.

use async_trait::async_trait;

mod cached;
mod config;
mod hashing;

pub use cached::CachedEmbedding;
pub use config::{
    accepts_dimensions, native_dimension, EmbeddingConfig, EmbeddingProvider, EnvEmbeddingConfig,
};
pub use hashing::HashingEmbedding;

/// Service for generating text embeddings.
///
/// Implementations must be deterministic for a given model version and always return
/// vectors of the same length.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Generates an embedding vector for a single text string.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error>;

    /// Generates embedding vectors for multiple texts, in input order.
    /// Providers with a batch endpoint override this to use a single request.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}
