//! Two-level cache store: generations owning entries
//!
//! The store is an arena of generations addressed by version string, each
//! generation owning a map of request key to response record. Deleting a
//! generation is a single bulk free of every entry it owns; concurrent
//! versions never collide on keys because they address different
//! generations.
//!
//! Two backends ship with the crate: [`MemoryStorage`] for embedders
//! without persistence (and for tests), and [`DiskStorage`] persisting one
//! JSON file per generation.

pub mod disk;
pub mod memory;

pub use disk::DiskStorage;
pub use memory::MemoryStorage;

use crate::error::OffcacheResult;
use crate::http::{CacheKey, Response};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A single cached entry: the response plus when it was stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntry {
    pub response: Response,
    pub stored_at: DateTime<Utc>,
}

impl StoredEntry {
    /// Record a response as stored now
    pub fn new(response: Response) -> Self {
        Self {
            response,
            stored_at: Utc::now(),
        }
    }
}

/// Storage of cache generations, addressed by version string
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open a generation, creating it if absent.
    async fn open(&self, generation: &str) -> OffcacheResult<Arc<dyn CacheGeneration>>;

    /// List the identifiers of all generations currently stored.
    async fn generations(&self) -> OffcacheResult<Vec<String>>;

    /// Delete a generation and every entry it owns.
    ///
    /// Returns `false` if the generation did not exist; absence is not an
    /// error.
    async fn delete(&self, generation: &str) -> OffcacheResult<bool>;
}

/// One open generation: entries keyed by request identity
#[async_trait]
pub trait CacheGeneration: Send + Sync {
    /// Look up the stored response for a key
    async fn get(&self, key: &CacheKey) -> OffcacheResult<Option<Response>>;

    /// Store a response under the key, overwriting any prior entry
    async fn put(&self, key: CacheKey, response: Response) -> OffcacheResult<()>;
}
