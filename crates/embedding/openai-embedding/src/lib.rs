//! # OpenAI Embedding Service
//!
//! This crate provides an implementation of the `EmbeddingService` trait using an
//! OpenAI-compatible `/embeddings` endpoint.
//!
//! ## OpenAIEmbedding
//!
//! Uses OpenAI's embedding models (e.g., `text-embedding-3-small`). The `text-embedding-3`
//! family accepts a `dimensions` parameter, so the memory store can keep its 384-float
//! vectors while using a hosted model.
//!
//! ## Example
//!
//! ```rust,no_run
//! use openai_embedding::OpenAIEmbedding;
//! use embedding::EmbeddingService;
//!
//! async fn example() -> Result<(), anyhow::Error> {
//!     let service = OpenAIEmbedding::new("sk-...".to_string(), "text-embedding-3-small".to_string())
//!         .with_dimensions(Some(384));
//!     let embedding = service.embed("Hello world").await?;
//!     assert_eq!(embedding.len(), 384);
//!     Ok(())
//! }
//! ```
//!
//! ## Timeouts
//!
//! A single `embed` is bounded to 30 seconds and `embed_batch` to 60 seconds.

use async_openai::{types::CreateEmbeddingRequestArgs, Client};
use async_trait::async_trait;
use embedding::{accepts_dimensions, EmbeddingConfig, EmbeddingService};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const EMBED_TIMEOUT: Duration = Duration::from_secs(30);
const EMBED_BATCH_TIMEOUT: Duration = Duration::from_secs(60);
const LOG_PREVIEW_LEN: usize = 200;

/// OpenAI embedding service implementation. Holds the async-openai client and model name.
#[derive(Debug, Clone)]
pub struct OpenAIEmbedding {
    client: Client<async_openai::config::OpenAIConfig>,
    /// Embedding model name (e.g. "text-embedding-3-small").
    model: String,
    /// Requested output dimension; `None` keeps the model's native size.
    dimensions: Option<u32>,
}

impl OpenAIEmbedding {
    /// Creates a new OpenAI embedding service.
    ///
    /// If `api_key` is empty, the OPENAI_API_KEY environment variable is used.
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_base_url(api_key, model, None)
    }

    /// Creates a new service sending requests to `base_url` when given (OpenAI-compatible endpoints).
    pub fn new_with_base_url(api_key: String, model: String, base_url: Option<&str>) -> Self {
        let api_key = if api_key.is_empty() {
            std::env::var("OPENAI_API_KEY").unwrap_or_default()
        } else {
            api_key
        };

        let mut openai_config = async_openai::config::OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url.filter(|s| !s.is_empty()) {
            openai_config = openai_config.with_api_base(url);
        }

        Self {
            client: Client::with_config(openai_config),
            model,
            dimensions: None,
        }
    }

    /// Builds the service from an [`EmbeddingConfig`], requesting the configured dimension.
    pub fn from_config(config: &dyn EmbeddingConfig) -> Self {
        Self::new_with_base_url(
            config.api_key().to_string(),
            config.model().to_string(),
            config.base_url(),
        )
        .with_dimensions(u32::try_from(config.dimension()).ok())
    }

    /// Sets the output dimension sent with each request.
    pub fn with_dimensions(mut self, dimensions: Option<u32>) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Sets a different embedding model.
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Returns the embedding model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn dimensions(&self) -> Option<u32> {
        self.dimensions
    }

    /// Only the text-embedding-3 family accepts a `dimensions` parameter.
    fn request_dimensions(&self) -> Option<u32> {
        self.dimensions.filter(|_| accepts_dimensions(&self.model))
    }

    async fn create(
        &self,
        inputs: Vec<&str>,
        timeout: Duration,
    ) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        let mut args = CreateEmbeddingRequestArgs::default();
        args.model(self.model.clone()).input(inputs);
        if let Some(dimensions) = self.request_dimensions() {
            args.dimensions(dimensions);
        }
        let request = args.build()?;

        let embeddings = self.client.embeddings();
        let response = match tokio::time::timeout(timeout, embeddings.create(request)).await {
            Ok(Ok(r)) => {
                debug!("OpenAI embeddings response received");
                r
            }
            Ok(Err(e)) => {
                warn!(error = %e, "OpenAI embeddings request failed");
                return Err(e.into());
            }
            Err(_) => {
                warn!(timeout_secs = timeout.as_secs(), "OpenAI embeddings request timed out");
                return Err(anyhow::anyhow!(
                    "OpenAI embeddings request timed out after {} seconds",
                    timeout.as_secs()
                ));
            }
        };

        Ok(response.data.into_iter().map(|item| item.embedding).collect())
    }
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(LOG_PREVIEW_LEN) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[async_trait]
impl EmbeddingService for OpenAIEmbedding {
    /// Embeds one text with a single `/embeddings` request.
    ///
    /// # Errors
    ///
    /// Fails when the key is missing or invalid, the request fails or times out, or the
    /// response carries no embedding.
    #[instrument(skip(self, text), fields(model = %self.model, text_len = text.len()))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        info!(
            model = %self.model,
            text_preview = %preview(text),
            "step: embedding OpenAI embed request"
        );

        let embedding = self
            .create(vec![text], EMBED_TIMEOUT)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                warn!("OpenAI embed response has no embedding data");
                anyhow::anyhow!("No embedding in response")
            })?;

        info!(dimension = embedding.len(), "step: embedding OpenAI embed done");
        Ok(embedding)
    }

    /// Embeds all texts in one request; results keep input order.
    #[instrument(skip(self, texts), fields(model = %self.model, batch_size = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        if texts.is_empty() {
            debug!("OpenAI embed_batch empty input, skipping");
            return Ok(vec![]);
        }

        info!(
            model = %self.model,
            batch_size = texts.len(),
            "step: embedding OpenAI embed_batch request"
        );

        let inputs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
        let embeddings = self.create(inputs, EMBED_BATCH_TIMEOUT).await?;

        if embeddings.len() != texts.len() {
            warn!(
                expected = texts.len(),
                got = embeddings.len(),
                "OpenAI embed_batch response count mismatch"
            );
            return Err(anyhow::anyhow!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            ));
        }

        info!(
            count = embeddings.len(),
            dimension = embeddings.first().map(|v| v.len()).unwrap_or(0),
            "step: embedding OpenAI embed_batch done"
        );
        Ok(embeddings)
    }
}
