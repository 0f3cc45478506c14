//! Shared test utilities for memory-inmemory integration tests.
//!
//! Provides table-driven and failure-injecting `EmbeddingService` mocks so the store can
//! be exercised without an embedding API.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use embedding::EmbeddingService;
use memory_core::MemoryConfig;
use memory_inmemory::VectorMemoryStore;

/// Embedder answering from a fixed text → vector table. Unknown texts are an error,
/// which doubles as a failure injector.
#[derive(Default)]
pub struct FixedEmbedding {
    vectors: Mutex<HashMap<String, Vec<f32>>>,
    calls: AtomicUsize,
}

impl FixedEmbedding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, text: &str, vector: Vec<f32>) -> Self {
        self.set(text, vector);
        self
    }

    pub fn set(&self, text: &str, vector: Vec<f32>) {
        self.vectors
            .lock()
            .unwrap()
            .insert(text.to_string(), vector);
    }

    pub fn remove(&self, text: &str) {
        self.vectors.lock().unwrap().remove(text);
    }

    /// Number of texts embedded so far (batch items counted individually).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingService for FixedEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.vectors
            .lock()
            .unwrap()
            .get(text)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no vector for {:?}", text))
    }
}

/// One-dimensional embedder: the vector is `[index of the text's first letter]`,
/// so "A" → [0.0], "B" → [1.0], ... Can be switched into failure mode.
#[derive(Default)]
pub struct LetterEmbedding {
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl LetterEmbedding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingService for LetterEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("embedding backend unavailable");
        }
        let first = text.chars().next().unwrap_or('A').to_ascii_uppercase();
        Ok(vec![(first as u32).saturating_sub('A' as u32) as f32])
    }
}

/// Embedder returning vectors of a fixed (possibly wrong) length.
pub struct ConstantEmbedding {
    pub dimension: usize,
}

#[async_trait]
impl EmbeddingService for ConstantEmbedding {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, anyhow::Error> {
        Ok(vec![0.5; self.dimension])
    }
}

/// Embedder that sleeps before answering like `LetterEmbedding`.
pub struct SlowEmbedding {
    pub delay: Duration,
}

#[async_trait]
impl EmbeddingService for SlowEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        tokio::time::sleep(self.delay).await;
        LetterEmbedding::new().embed(text).await
    }
}

/// Store of dimension 1 over `embedder`.
pub fn store_1d(
    embedder: Arc<dyn EmbeddingService>,
    max_size: usize,
    retention_ratio: f64,
) -> VectorMemoryStore {
    VectorMemoryStore::new(
        embedder,
        MemoryConfig::new(max_size, retention_ratio).with_dimension(1),
    )
}

/// Texts of the store's records, oldest first.
pub async fn texts(store: &VectorMemoryStore) -> Vec<String> {
    store.snapshot().await.into_iter().map(|r| r.text).collect()
}
