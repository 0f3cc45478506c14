//! Memory configuration: capacity, retention ratio, dimension and embedding deadline.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Default maximum number of records held by a store.
pub const DEFAULT_MAX_SIZE: usize = 100;
/// Default fraction of capacity kept (most recent first) when a full store compacts.
pub const DEFAULT_RETENTION_RATIO: f64 = 0.75;
/// Default embedding dimension (all-MiniLM-L6-v2 sized vectors).
pub const DEFAULT_DIMENSION: usize = 384;
/// Default number of neighbours recalled per query.
pub const DEFAULT_TOP_K: usize = 2;

/// Capacity and shape of one vector memory store.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryConfig {
    max_size: usize,
    retention_ratio: f64,
    dimension: usize,
    embed_timeout: Option<Duration>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE, DEFAULT_RETENTION_RATIO)
    }
}

impl MemoryConfig {
    /// Creates a config. `retention_ratio` is clamped into `[0, 1]`; NaN becomes 0.
    pub fn new(max_size: usize, retention_ratio: f64) -> Self {
        Self {
            max_size,
            retention_ratio: sanitize_ratio(retention_ratio),
            dimension: DEFAULT_DIMENSION,
            embed_timeout: None,
        }
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Sets a deadline applied to every embedding call the store makes.
    pub fn with_embed_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.embed_timeout = timeout;
        self
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn retention_ratio(&self) -> f64 {
        self.retention_ratio
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn embed_timeout(&self) -> Option<Duration> {
        self.embed_timeout
    }

    /// Number of records a store holds right after a compaction, the new record included.
    ///
    /// `floor(max_size * retention_ratio)`, never above `max_size`. Zero when `max_size`
    /// is zero; a compaction then keeps only the new record.
    pub fn keep_count(&self) -> usize {
        let keep = (self.max_size as f64 * self.retention_ratio).floor() as usize;
        keep.min(self.max_size)
    }

    /// Number of existing records that survive a compaction (the newest ones).
    pub fn retained_on_compaction(&self) -> usize {
        self.keep_count().saturating_sub(1)
    }
}

fn sanitize_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

/// Memory settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvMemoryConfig {
    pub memory_max_size: usize,
    pub memory_retention_ratio: f64,
    pub memory_top_k: usize,
    pub memory_embed_timeout_secs: Option<u64>,
}

impl EnvMemoryConfig {
    /// Load from environment variables.
    pub fn from_env() -> Result<Self> {
        let memory_max_size = parse_var("MEMORY_MAX_SIZE")?.unwrap_or(DEFAULT_MAX_SIZE);
        let memory_retention_ratio =
            parse_var("MEMORY_RETENTION_RATIO")?.unwrap_or(DEFAULT_RETENTION_RATIO);
        let memory_top_k = parse_var("MEMORY_TOP_K")?.unwrap_or(DEFAULT_TOP_K);
        let memory_embed_timeout_secs = parse_var("MEMORY_EMBED_TIMEOUT_SECS")?;
        Ok(Self {
            memory_max_size,
            memory_retention_ratio,
            memory_top_k,
            memory_embed_timeout_secs,
        })
    }

    /// Validate config (top_k must be at least 1).
    pub fn validate(&self) -> Result<()> {
        if self.memory_top_k == 0 {
            anyhow::bail!("MEMORY_TOP_K must be at least 1");
        }
        Ok(())
    }

    /// Builds the store config for embeddings of the given dimension.
    pub fn to_memory_config(&self, dimension: usize) -> MemoryConfig {
        MemoryConfig::new(self.memory_max_size, self.memory_retention_ratio)
            .with_dimension(dimension)
            .with_embed_timeout(self.memory_embed_timeout_secs.map(Duration::from_secs))
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} has an invalid value: {}", name, raw)),
        _ => Ok(None),
    }
}
