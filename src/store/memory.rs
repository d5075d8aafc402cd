//! In-memory cache storage

use crate::error::OffcacheResult;
use crate::http::{CacheKey, Response};
use crate::store::{CacheGeneration, CacheStorage, StoredEntry};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type GenerationMap = HashMap<String, HashMap<CacheKey, StoredEntry>>;

/// Cache storage held entirely in memory
///
/// The default backend for embedders without persistence, and the store
/// used throughout the test suite.
#[derive(Default)]
pub struct MemoryStorage {
    generations: Arc<RwLock<GenerationMap>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in a generation, if it exists
    pub async fn entry_count(&self, generation: &str) -> Option<usize> {
        self.generations
            .read()
            .await
            .get(generation)
            .map(|entries| entries.len())
    }
}

#[async_trait]
impl CacheStorage for MemoryStorage {
    async fn open(&self, generation: &str) -> OffcacheResult<Arc<dyn CacheGeneration>> {
        let mut map = self.generations.write().await;
        map.entry(generation.to_string()).or_default();

        Ok(Arc::new(MemoryGeneration {
            name: generation.to_string(),
            generations: Arc::clone(&self.generations),
        }))
    }

    async fn generations(&self) -> OffcacheResult<Vec<String>> {
        let mut names: Vec<String> = self.generations.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn delete(&self, generation: &str) -> OffcacheResult<bool> {
        let mut map = self.generations.write().await;
        Ok(map.remove(generation).is_some())
    }
}

/// Handle to one generation within a [`MemoryStorage`]
struct MemoryGeneration {
    name: String,
    generations: Arc<RwLock<GenerationMap>>,
}

#[async_trait]
impl CacheGeneration for MemoryGeneration {
    async fn get(&self, key: &CacheKey) -> OffcacheResult<Option<Response>> {
        let map = self.generations.read().await;
        Ok(map
            .get(&self.name)
            .and_then(|entries| entries.get(key))
            .map(|entry| entry.response.clone()))
    }

    async fn put(&self, key: CacheKey, response: Response) -> OffcacheResult<()> {
        let mut map = self.generations.write().await;
        map.entry(self.name.clone())
            .or_default()
            .insert(key, StoredEntry::new(response));
        Ok(())
    }
}
