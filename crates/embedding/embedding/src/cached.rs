//! Memoizing wrapper around an [`EmbeddingService`].
//!
//! Compaction of the vector memory re-embeds every retained text; with this wrapper those
//! texts are served from memory instead of hitting the provider again. Entries are evicted
//! oldest-inserted first once `capacity` is reached.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::EmbeddingService;

#[derive(Default)]
struct CacheState {
    vectors: HashMap<String, Vec<f32>>,
    order: VecDeque<String>,
}

/// Embedding service that remembers up to `capacity` text → vector results.
pub struct CachedEmbedding {
    inner: Arc<dyn EmbeddingService>,
    capacity: usize,
    state: Mutex<CacheState>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CachedEmbedding {
    /// Wraps `inner`. A `capacity` of 0 disables memoization.
    pub fn new(inner: Arc<dyn EmbeddingService>, capacity: usize) -> Self {
        Self {
            inner,
            capacity,
            state: Mutex::new(CacheState::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of lookups forwarded to the wrapped service.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Number of cached vectors.
    pub fn len(&self) -> usize {
        self.lock().vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lookup(&self, text: &str) -> Option<Vec<f32>> {
        self.lock().vectors.get(text).cloned()
    }

    fn insert(&self, text: &str, vector: &[f32]) {
        if self.capacity == 0 {
            return;
        }
        let mut state = self.lock();
        if state.vectors.contains_key(text) {
            return;
        }
        while state.order.len() >= self.capacity {
            match state.order.pop_front() {
                Some(oldest) => {
                    state.vectors.remove(&oldest);
                }
                None => break,
            }
        }
        state.order.push_back(text.to_string());
        state.vectors.insert(text.to_string(), vector.to_vec());
    }
}

#[async_trait]
impl EmbeddingService for CachedEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        if let Some(vector) = self.lookup(text) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(vector);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let vector = self.inner.embed(text).await?;
        self.insert(text, &vector);
        Ok(vector)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        let mut results: Vec<Option<Vec<f32>>> = texts.iter().map(|t| self.lookup(t)).collect();

        let mut missing: Vec<String> = Vec::new();
        for (text, slot) in texts.iter().zip(&results) {
            if slot.is_none() && !missing.contains(text) {
                missing.push(text.clone());
            }
        }
        let hit_count = results.iter().filter(|r| r.is_some()).count() as u64;
        self.hits.fetch_add(hit_count, Ordering::Relaxed);
        self.misses.fetch_add(missing.len() as u64, Ordering::Relaxed);
        debug!(
            batch_size = texts.len(),
            hits = hit_count,
            misses = missing.len(),
            "step: embedding cache embed_batch"
        );

        if !missing.is_empty() {
            let fetched = self.inner.embed_batch(&missing).await?;
            if fetched.len() != missing.len() {
                anyhow::bail!(
                    "Expected {} embeddings, got {}",
                    missing.len(),
                    fetched.len()
                );
            }
            let fetched: HashMap<&str, Vec<f32>> = missing
                .iter()
                .map(String::as_str)
                .zip(fetched)
                .collect();
            for (text, vector) in &fetched {
                self.insert(text, vector);
            }
            for (text, slot) in texts.iter().zip(results.iter_mut()) {
                if slot.is_none() {
                    *slot = fetched.get(text.as_str()).cloned();
                }
            }
        }

        results
            .into_iter()
            .map(|r| r.ok_or_else(|| anyhow::anyhow!("Missing embedding in batch result")))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    /// Counts calls to the wrapped service; vector is `[text.len()]`.
    struct Counting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingService for Counting {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![text.len() as f32])
        }
    }

    fn counting() -> Arc<Counting> {
        Arc::new(Counting {
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_second_embed_is_served_from_cache() {
        let inner = counting();
        let cached = CachedEmbedding::new(inner.clone(), 8);
        assert_eq!(cached.embed("abc").await.unwrap(), vec![3.0]);
        assert_eq!(cached.embed("abc").await.unwrap(), vec![3.0]);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cached.hits(), 1);
        assert_eq!(cached.misses(), 1);
    }

    #[tokio::test]
    async fn test_batch_only_fetches_misses() {
        let inner = counting();
        let cached = CachedEmbedding::new(inner.clone(), 8);
        cached.embed("a").await.unwrap();
        let texts = vec!["a".to_string(), "bb".to_string(), "bb".to_string()];
        let vectors = cached.embed_batch(&texts).await.unwrap();
        assert_eq!(vectors, vec![vec![1.0], vec![2.0], vec![2.0]]);
        // "a" once, then "bb" once for the deduplicated miss
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let inner = counting();
        let cached = CachedEmbedding::new(inner.clone(), 2);
        cached.embed("a").await.unwrap();
        cached.embed("bb").await.unwrap();
        cached.embed("ccc").await.unwrap();
        assert_eq!(cached.len(), 2);
        cached.embed("a").await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_zero_capacity_disables_cache() {
        let inner = counting();
        let cached = CachedEmbedding::new(inner.clone(), 0);
        cached.embed("a").await.unwrap();
        cached.embed("a").await.unwrap();
        assert!(cached.is_empty());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}
