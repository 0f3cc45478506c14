//! [`VectorMemoryStore`]: records plus a parallel [`FlatL2Index`], bounded by
//! [`MemoryConfig::max_size`].

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use embedding::EmbeddingService;
use memory_core::{
    ConversationMemory, MemoryConfig, MemoryContext, MemoryError, MemoryRecord, MemoryRole,
    ScoredRecord, StoreOutcome,
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, instrument};

use crate::index::FlatL2Index;

/// Records and index, always replaced or extended together.
#[derive(Debug)]
struct MemoryState {
    records: Vec<MemoryRecord>,
    index: FlatL2Index,
}

impl MemoryState {
    fn with_capacity(dimension: usize, rows: usize) -> Self {
        Self {
            records: Vec::with_capacity(rows),
            index: FlatL2Index::with_capacity(dimension, rows),
        }
    }

    /// Appends to the index first so a rejected vector leaves both untouched.
    fn push(&mut self, record: MemoryRecord) -> Result<(), MemoryError> {
        self.index.add(&record.vector)?;
        self.records.push(record);
        Ok(())
    }
}

/// Point-in-time sizes, read under a single lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStats {
    /// Records held
    pub records: usize,
    /// Vectors indexed
    pub indexed: usize,
    /// Configured maximum
    pub capacity: usize,
}

/// Bounded conversation memory with exact nearest-neighbour recall.
///
/// Cloning is cheap and yields a handle to the same store. Writers (`store`, `clear`)
/// are serialized by an internal mutex held for the whole call, embedding included;
/// the records and index are only write-locked for the final append or swap, so readers
/// always see a complete state.
#[derive(Clone)]
pub struct VectorMemoryStore {
    config: Arc<MemoryConfig>,
    embedder: Arc<dyn EmbeddingService>,
    state: Arc<RwLock<MemoryState>>,
    writer: Arc<Mutex<()>>,
}

impl VectorMemoryStore {
    /// Creates an empty store using `embedder` for both records and queries.
    pub fn new(embedder: Arc<dyn EmbeddingService>, config: MemoryConfig) -> Self {
        let state = MemoryState::with_capacity(config.dimension(), 0);
        Self {
            config: Arc::new(config),
            embedder,
            state: Arc::new(RwLock::new(state)),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Creates an empty store with the default capacity (100), retention (0.75) and
    /// dimension (384).
    pub fn with_defaults(embedder: Arc<dyn EmbeddingService>) -> Self {
        Self::new(embedder, MemoryConfig::default())
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Number of records currently held.
    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of indexed vectors; equal to [`len`](Self::len) at every observable point.
    pub async fn index_len(&self) -> usize {
        self.state.read().await.index.len()
    }

    pub async fn stats(&self) -> MemoryStats {
        let state = self.state.read().await;
        MemoryStats {
            records: state.records.len(),
            indexed: state.index.len(),
            capacity: self.config.max_size(),
        }
    }

    /// Copies of all records, oldest first.
    pub async fn snapshot(&self) -> Vec<MemoryRecord> {
        self.state.read().await.records.clone()
    }

    /// Drops every record and the index.
    pub async fn clear(&self) {
        let _writer = self.writer.lock().await;
        let mut state = self.state.write().await;
        let dropped = state.records.len();
        *state = MemoryState::with_capacity(self.config.dimension(), 0);
        info!(dropped, "step: memory cleared");
    }

    /// Embeds `text` and appends it. When the store is full, keeps only the newest
    /// records so that, with the new record appended, the store holds
    /// [`keep_count`](MemoryConfig::keep_count) records (at least the new one). Kept
    /// records are re-embedded into a fresh index and the old state is replaced in one swap.
    ///
    /// All-or-nothing: on any error the store is unchanged.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn store(&self, text: &str, role: MemoryRole) -> Result<StoreOutcome, MemoryError> {
        if text.trim().is_empty() {
            return Err(MemoryError::EmptyText);
        }

        let _writer = self.writer.lock().await;
        let vector = self.embed_one(text).await?;
        let record = MemoryRecord::new(text, role, vector);

        let held = self.len().await;
        if held < self.config.max_size() {
            let mut state = self.state.write().await;
            state.push(record)?;
            debug!(records = state.records.len(), "step: memory record appended");
            return Ok(StoreOutcome::Appended);
        }

        let keep = self.config.retained_on_compaction();
        let retained: Vec<(String, MemoryRole)> = {
            let state = self.state.read().await;
            let start = state.records.len().saturating_sub(keep);
            state.records[start..]
                .iter()
                .map(|r| (r.text.clone(), r.role))
                .collect()
        };
        let texts: Vec<String> = retained.iter().map(|(t, _)| t.clone()).collect();
        let vectors = self.embed_many(&texts).await?;

        let mut next = MemoryState::with_capacity(self.config.dimension(), retained.len() + 1);
        for ((text, role), vector) in retained.into_iter().zip(vectors) {
            next.push(MemoryRecord::new(text, role, vector))?;
        }
        next.push(record)?;

        let mut state = self.state.write().await;
        let evicted = state.records.len().saturating_sub(keep);
        *state = next;
        info!(
            evicted,
            kept = keep,
            records = state.records.len(),
            "step: memory compacted"
        );
        Ok(StoreOutcome::Compacted { evicted })
    }

    /// Returns up to `k` records nearest to `query` with their squared L2 distances,
    /// nearest first; ties keep insertion order. An empty store returns an empty list
    /// without embedding the query.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn retrieve_scored(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredRecord>, MemoryError> {
        if k == 0 {
            return Err(MemoryError::InvalidTopK);
        }
        if self.is_empty().await {
            return Ok(Vec::new());
        }

        let query_vector = self.embed_one(query).await?;
        let state = self.state.read().await;
        let hits = state.index.search(&query_vector, k)?;
        Ok(hits
            .into_iter()
            .filter_map(|(position, distance)| {
                state.records.get(position).map(|record| ScoredRecord {
                    position,
                    distance,
                    record: record.clone(),
                })
            })
            .collect())
    }

    /// Returns the texts of the `k` nearest records joined by a single space, nearest
    /// first, or [`MemoryContext::NoRelevantMemory`] when nothing is found.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<MemoryContext, MemoryError> {
        let hits = self.retrieve_scored(query, k).await?;
        if hits.is_empty() {
            debug!("step: memory retrieve found nothing");
            return Ok(MemoryContext::NoRelevantMemory);
        }
        let texts: Vec<&str> = hits.iter().map(|h| h.record.text.as_str()).collect();
        debug!(retrieved = ?texts, "step: memory retrieve done");
        Ok(MemoryContext::Relevant(texts.join(" ")))
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        let vector = self.with_deadline(self.embedder.embed(text)).await?;
        self.check_dimension(&vector)?;
        Ok(vector)
    }

    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MemoryError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let vectors = self.with_deadline(self.embedder.embed_batch(texts)).await?;
        if vectors.len() != texts.len() {
            return Err(MemoryError::Embedding(anyhow::anyhow!(
                "Expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        for vector in &vectors {
            self.check_dimension(vector)?;
        }
        Ok(vectors)
    }

    async fn with_deadline<T, F>(&self, fut: F) -> Result<T, MemoryError>
    where
        F: Future<Output = Result<T, anyhow::Error>>,
    {
        match self.config.embed_timeout() {
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(result) => result.map_err(MemoryError::Embedding),
                Err(_) => Err(MemoryError::EmbeddingTimeout { timeout: limit }),
            },
            None => fut.await.map_err(MemoryError::Embedding),
        }
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<(), MemoryError> {
        let expected = self.config.dimension();
        if vector.len() != expected {
            error!(
                expected,
                actual = vector.len(),
                "embedding dimension mismatch, refusing vector"
            );
            return Err(MemoryError::DimensionMismatch {
                expected,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ConversationMemory for VectorMemoryStore {
    async fn store(&self, text: &str, role: MemoryRole) -> Result<StoreOutcome, MemoryError> {
        VectorMemoryStore::store(self, text, role).await
    }

    async fn retrieve(&self, query: &str, k: usize) -> Result<MemoryContext, MemoryError> {
        VectorMemoryStore::retrieve(self, query, k).await
    }

    async fn len(&self) -> usize {
        VectorMemoryStore::len(self).await
    }

    async fn clear(&self) {
        VectorMemoryStore::clear(self).await
    }
}
