//! # In-Memory Vector Store
//!
//! Bounded, per-session memory of conversation turns with exact nearest-neighbour recall.
//!
//! ## VectorMemoryStore
//!
//! Holds `(text, role, vector)` records in conversation order and a parallel
//! [`FlatL2Index`]. Position `i` of the index is always the vector of record `i`.
//!
//! **Capacity**: at most `max_size` records (default 100). Storing into a full store
//! triggers a *compaction*: the newest records are re-embedded into a brand-new index,
//! the new record is appended, and the result replaces the old state in one swap. After a
//! compaction the store holds `floor(max_size * retention_ratio)` records (default 75),
//! the new one included. Eviction is by recency only.
//!
//! **Recall**: squared Euclidean distance, ascending, ties broken by insertion order.
//!
//! **Limitations**:
//! - Data is lost on restart
//! - Evicted records are dropped without archival
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use embedding::HashingEmbedding;
//! use memory_core::{MemoryConfig, MemoryRole};
//! use memory_inmemory::VectorMemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), anyhow::Error> {
//!     let store = VectorMemoryStore::new(
//!         Arc::new(HashingEmbedding::new(384)),
//!         MemoryConfig::default(),
//!     );
//!
//!     store.store("My cat is called Miso", MemoryRole::User).await?;
//!     let context = store.retrieve("what is my cat called", 2).await?;
//!     assert!(context.to_string().contains("Miso"));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Thread Safety
//!
//! Records and index sit behind one `tokio::sync::RwLock`; writers are serialized by a
//! separate mutex so that slow re-embedding during compaction never blocks readers.

pub mod index;
pub mod store;

pub use index::{squared_l2, FlatL2Index};
pub use store::{MemoryStats, VectorMemoryStore};
