//! Embedding configuration: trait and env-based implementation.

use anyhow::{Context, Result};
use std::env;

/// Default OpenAI embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
/// Default embedding dimension requested from the provider.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;
/// Default number of memoized embeddings.
pub const DEFAULT_CACHE_SIZE: usize = 512;

/// True when `model` accepts a `dimensions` request parameter (the text-embedding-3 family).
pub fn accepts_dimensions(model: &str) -> bool {
    model.starts_with("text-embedding-3")
}

/// Native output size of known OpenAI embedding models.
pub fn native_dimension(model: &str) -> Option<usize> {
    match model {
        "text-embedding-3-small" | "text-embedding-ada-002" => Some(1536),
        "text-embedding-3-large" => Some(3072),
        _ => None,
    }
}

/// Which backend produces embeddings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProvider {
    /// OpenAI-compatible `/embeddings` endpoint.
    OpenAI,
    /// Local feature hashing; no network, no key.
    Local,
}

impl EmbeddingProvider {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "openai" => Ok(Self::OpenAI),
            "local" | "hashing" => Ok(Self::Local),
            other => anyhow::bail!(
                "Unknown EMBEDDING_PROVIDER '{}' (expected openai or local)",
                other
            ),
        }
    }
}

/// Embedding service configuration interface.
pub trait EmbeddingConfig: Send + Sync {
    fn provider(&self) -> EmbeddingProvider;
    /// API key for the OpenAI-compatible endpoint.
    fn api_key(&self) -> &str;
    /// Optional base URL for OpenAI-compatible endpoints.
    fn base_url(&self) -> Option<&str>;
    fn model(&self) -> &str;
    /// Vector length every embedding must have.
    fn dimension(&self) -> usize;
    /// Number of memoized embeddings; 0 disables the cache.
    fn cache_size(&self) -> usize;
}

/// Embedding config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvEmbeddingConfig {
    pub embedding_provider: EmbeddingProvider,
    pub embedding_api_key: String,
    pub embedding_base_url: Option<String>,
    pub embedding_model: String,
    pub embedding_dim: usize,
    pub embedding_cache_size: usize,
}

impl EmbeddingConfig for EnvEmbeddingConfig {
    fn provider(&self) -> EmbeddingProvider {
        self.embedding_provider
    }
    fn api_key(&self) -> &str {
        &self.embedding_api_key
    }
    fn base_url(&self) -> Option<&str> {
        self.embedding_base_url.as_deref().filter(|s| !s.is_empty())
    }
    fn model(&self) -> &str {
        &self.embedding_model
    }
    fn dimension(&self) -> usize {
        self.embedding_dim
    }
    fn cache_size(&self) -> usize {
        self.embedding_cache_size
    }
}

impl EnvEmbeddingConfig {
    /// Load from environment variables.
    pub fn from_env() -> Result<Self> {
        let embedding_provider =
            EmbeddingProvider::parse(&env::var("EMBEDDING_PROVIDER").unwrap_or_default())?;
        let embedding_api_key = env::var("EMBEDDING_API_KEY")
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .unwrap_or_default();
        let embedding_base_url = env::var("EMBEDDING_BASE_URL")
            .or_else(|_| env::var("OPENAI_BASE_URL"))
            .ok()
            .filter(|s| !s.trim().is_empty());
        let embedding_model = env::var("EMBEDDING_MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());
        let embedding_dim = match env::var("EMBEDDING_DIM") {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("EMBEDDING_DIM is not a number: {}", raw))?,
            Err(_) => DEFAULT_EMBEDDING_DIM,
        };
        let embedding_cache_size = env::var("EMBEDDING_CACHE_SIZE")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_CACHE_SIZE);
        Ok(Self {
            embedding_provider,
            embedding_api_key,
            embedding_base_url,
            embedding_model,
            embedding_dim,
            embedding_cache_size,
        })
    }

    /// Validate config (e.g. openai requires an API key, dimension must be non-zero).
    pub fn validate(&self) -> Result<()> {
        if self.embedding_dim == 0 {
            anyhow::bail!("EMBEDDING_DIM must be greater than zero");
        }
        if self.embedding_provider != EmbeddingProvider::OpenAI {
            return Ok(());
        }
        if self.embedding_api_key.is_empty() {
            anyhow::bail!(
                "EMBEDDING_PROVIDER=openai requires EMBEDDING_API_KEY or OPENAI_API_KEY to be set \
                 (or use EMBEDDING_PROVIDER=local)"
            );
        }
        let model = self.embedding_model.as_str();
        match native_dimension(model) {
            Some(native) if accepts_dimensions(model) && self.embedding_dim > native => {
                anyhow::bail!(
                    "EMBEDDING_DIM={} exceeds the {} output size of {}",
                    self.embedding_dim,
                    native,
                    model
                );
            }
            Some(native) if !accepts_dimensions(model) && self.embedding_dim != native => {
                anyhow::bail!(
                    "{} always returns {} floats and ignores EMBEDDING_DIM; set EMBEDDING_DIM={} \
                     or use a text-embedding-3 model",
                    model,
                    native,
                    native
                );
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: EmbeddingProvider, key: &str) -> EnvEmbeddingConfig {
        EnvEmbeddingConfig {
            embedding_provider: provider,
            embedding_api_key: key.to_string(),
            embedding_base_url: Some(String::new()),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            embedding_cache_size: DEFAULT_CACHE_SIZE,
        }
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!(EmbeddingProvider::parse("").unwrap(), EmbeddingProvider::OpenAI);
        assert_eq!(EmbeddingProvider::parse("OpenAI").unwrap(), EmbeddingProvider::OpenAI);
        assert_eq!(EmbeddingProvider::parse("local").unwrap(), EmbeddingProvider::Local);
        assert!(EmbeddingProvider::parse("faiss").is_err());
    }

    #[test]
    fn test_openai_requires_key() {
        assert!(config(EmbeddingProvider::OpenAI, "").validate().is_err());
        assert!(config(EmbeddingProvider::OpenAI, "sk-test").validate().is_ok());
        assert!(config(EmbeddingProvider::Local, "").validate().is_ok());
    }

    fn openai_model(model: &str, dim: usize) -> EnvEmbeddingConfig {
        EnvEmbeddingConfig {
            embedding_model: model.to_string(),
            embedding_dim: dim,
            ..config(EmbeddingProvider::OpenAI, "sk-test")
        }
    }

    #[test]
    fn test_fixed_size_model_must_match_dimension() {
        assert!(openai_model("text-embedding-ada-002", 384).validate().is_err());
        assert!(openai_model("text-embedding-ada-002", 1536).validate().is_ok());
    }

    #[test]
    fn test_v3_model_dimension_within_native_size() {
        assert!(openai_model("text-embedding-3-small", 384).validate().is_ok());
        assert!(openai_model("text-embedding-3-small", 4096).validate().is_err());
        assert!(openai_model("text-embedding-3-large", 3072).validate().is_ok());
    }

    #[test]
    fn test_unknown_model_is_left_to_the_endpoint() {
        assert!(openai_model("my-proxy-embedder", 384).validate().is_ok());
    }

    #[test]
    fn test_empty_base_url_is_none() {
        assert_eq!(config(EmbeddingProvider::Local, "").base_url(), None);
    }
}
