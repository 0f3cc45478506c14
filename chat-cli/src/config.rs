//! Application config: every concern loaded from env, then CLI overrides applied.

use std::sync::Arc;

use anyhow::{Context, Result};
use chat_session::{ChatSession, SessionSettings};
use embedding::{
    CachedEmbedding, EmbeddingConfig, EmbeddingProvider, EmbeddingService, EnvEmbeddingConfig,
    HashingEmbedding,
};
use llm_client::{EnvLlmConfig, LlmClient, LlmConfig, OpenAILlmClient};
use memory_core::EnvMemoryConfig;
use memory_inmemory::VectorMemoryStore;
use openai_client::mask_token;
use openai_embedding::OpenAIEmbedding;
use prompt::DEFAULT_HISTORY_TURNS;
use tracing::info;

pub const DEFAULT_LOG_FILE: &str = "logs/memchat.log";

/// Values given on the command line; each one wins over its env counterpart.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub max_memory: Option<usize>,
    pub top_k: Option<usize>,
    pub log_file: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub embedding: EnvEmbeddingConfig,
    pub memory: EnvMemoryConfig,
    pub llm: EnvLlmConfig,
    pub log_file: String,
}

impl AppConfig {
    /// Loads and validates everything. Call after `dotenvy::dotenv()`.
    pub fn load(overrides: &ConfigOverrides) -> Result<Self> {
        let embedding = EnvEmbeddingConfig::from_env().context("Load embedding config")?;
        embedding.validate()?;

        let mut memory = EnvMemoryConfig::from_env().context("Load memory config")?;
        if let Some(max) = overrides.max_memory {
            memory.memory_max_size = max;
        }
        if let Some(k) = overrides.top_k {
            memory.memory_top_k = k;
        }
        memory.validate()?;

        let llm = EnvLlmConfig::from_env().context("Load LLM config")?;
        llm.validate()?;

        let log_file = overrides
            .log_file
            .clone()
            .or_else(|| std::env::var("LOG_FILE").ok().filter(|s| !s.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

        Ok(Self {
            embedding,
            memory,
            llm,
            log_file,
        })
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            assistant_name: self.llm.assistant_name().to_string(),
            system_prompt: self.llm.system_prompt().map(str::to_string),
            top_k: self.memory.memory_top_k,
            history_turns: DEFAULT_HISTORY_TURNS,
        }
    }

    /// Wires embedder, store and LLM into a fresh session.
    pub fn build_session(&self) -> ChatSession {
        let embedder = build_embedder(&self.embedding);
        let store = VectorMemoryStore::new(
            embedder,
            self.memory.to_memory_config(self.embedding.dimension()),
        );
        let llm: Arc<dyn LlmClient> = Arc::new(OpenAILlmClient::from_config(&self.llm));
        info!(
            provider = ?self.embedding.provider(),
            dimension = self.embedding.dimension(),
            max_memory = self.memory.memory_max_size,
            top_k = self.memory.memory_top_k,
            model = %self.llm.model(),
            api_key = %mask_token(self.llm.api_key()),
            "step: session built"
        );
        ChatSession::new(Arc::new(store), llm, self.session_settings())
    }
}

/// Embedder for the configured provider, memoized when the cache size is non-zero.
pub fn build_embedder(config: &dyn EmbeddingConfig) -> Arc<dyn EmbeddingService> {
    let inner: Arc<dyn EmbeddingService> = match config.provider() {
        EmbeddingProvider::OpenAI => Arc::new(OpenAIEmbedding::from_config(config)),
        EmbeddingProvider::Local => Arc::new(HashingEmbedding::new(config.dimension())),
    };
    if config.cache_size() == 0 {
        inner
    } else {
        Arc::new(CachedEmbedding::new(inner, config.cache_size()))
    }
}
