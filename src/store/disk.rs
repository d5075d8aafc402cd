//! JSON-file cache storage
//!
//! One `<generation>.json` file per generation under a storage root,
//! holding a map from the string form of the request key to the stored
//! entry. Writes are read-modify-write per put; last-write-wins is
//! acceptable under the host's cooperative scheduling model.

use crate::error::{OffcacheError, OffcacheResult};
use crate::http::{CacheKey, Response};
use crate::store::{CacheGeneration, CacheStorage, StoredEntry};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

type EntryMap = HashMap<String, StoredEntry>;

/// Cache storage persisted as JSON files
pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    /// Create a storage rooted at the given directory
    ///
    /// The directory is created on first use, not here.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn generation_path(&self, generation: &str) -> PathBuf {
        self.root.join(format!("{}.json", generation))
    }

    async fn ensure_root(&self) -> OffcacheResult<()> {
        fs::create_dir_all(&self.root).await.map_err(|e| {
            OffcacheError::io(
                format!("creating cache directory {}", self.root.display()),
                e,
            )
        })
    }
}

#[async_trait]
impl CacheStorage for DiskStorage {
    async fn open(&self, generation: &str) -> OffcacheResult<Arc<dyn CacheGeneration>> {
        self.ensure_root().await?;

        let path = self.generation_path(generation);
        if !path.exists() {
            // An empty file makes the generation enumerable before any put
            write_entries(&path, &EntryMap::new()).await?;
            debug!("Created cache generation file {}", path.display());
        }

        Ok(Arc::new(DiskGeneration { path }))
    }

    async fn generations(&self) -> OffcacheResult<Vec<String>> {
        if !self.root.exists() {
            return Ok(vec![]);
        }

        let mut names = vec![];
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|e| OffcacheError::io("reading cache directory", e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| OffcacheError::io("reading cache directory entry", e))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    async fn delete(&self, generation: &str) -> OffcacheResult<bool> {
        let path = self.generation_path(generation);
        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(&path).await.map_err(|e| {
            OffcacheError::io(format!("deleting cache generation {}", path.display()), e)
        })?;
        Ok(true)
    }
}

/// Handle to one generation file
struct DiskGeneration {
    path: PathBuf,
}

#[async_trait]
impl CacheGeneration for DiskGeneration {
    async fn get(&self, key: &CacheKey) -> OffcacheResult<Option<Response>> {
        let entries = read_entries(&self.path).await?;
        Ok(entries
            .get(&key.storage_key())
            .map(|entry| entry.response.clone()))
    }

    async fn put(&self, key: CacheKey, response: Response) -> OffcacheResult<()> {
        let mut entries = read_entries(&self.path).await?;
        entries.insert(key.storage_key(), StoredEntry::new(response));
        write_entries(&self.path, &entries).await
    }
}

async fn read_entries(path: &Path) -> OffcacheResult<EntryMap> {
    match fs::read_to_string(path).await {
        Ok(content) if content.trim().is_empty() => Ok(EntryMap::new()),
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(EntryMap::new()),
        Err(e) => Err(OffcacheError::io(
            format!("reading cache file {}", path.display()),
            e,
        )),
    }
}

async fn write_entries(path: &Path, entries: &EntryMap) -> OffcacheResult<()> {
    let content = serde_json::to_string_pretty(entries)?;
    fs::write(path, content)
        .await
        .map_err(|e| OffcacheError::io(format!("writing cache file {}", path.display()), e))
}
