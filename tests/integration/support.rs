//! Shared fakes for integration tests

use async_trait::async_trait;
use offcache::error::{OffcacheError, OffcacheResult};
use offcache::host::{HostControl, NetworkFetch};
use offcache::http::{CacheKey, Request, Response};
use offcache::store::{CacheGeneration, CacheStorage, MemoryStorage};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scriptable network: serves canned responses per URL, optionally offline
#[derive(Default)]
pub struct FakeNetwork {
    responses: Mutex<HashMap<String, Response>>,
    offline: AtomicBool,
    fetch_count: AtomicUsize,
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, url: &str, response: Response) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NetworkFetch for FakeNetwork {
    async fn fetch(&self, request: &Request) -> OffcacheResult<Response> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        if self.offline.load(Ordering::SeqCst) {
            return Err(OffcacheError::network(&request.url, "offline"));
        }

        self.responses
            .lock()
            .unwrap()
            .get(&request.url)
            .cloned()
            .ok_or_else(|| OffcacheError::network(&request.url, "connection refused"))
    }
}

/// Records lifecycle signals received from the worker
#[derive(Default)]
pub struct RecordingControl {
    skip_waiting_calls: AtomicUsize,
    claim_calls: AtomicUsize,
}

impl RecordingControl {
    pub fn skip_waiting_calls(&self) -> usize {
        self.skip_waiting_calls.load(Ordering::SeqCst)
    }

    pub fn claim_calls(&self) -> usize {
        self.claim_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostControl for RecordingControl {
    async fn skip_waiting(&self) -> OffcacheResult<()> {
        self.skip_waiting_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn claim_clients(&self) -> OffcacheResult<()> {
        self.claim_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Storage wrapper whose delete fails for one named generation
pub struct FlakyStorage {
    inner: Arc<MemoryStorage>,
    fail_delete: String,
}

impl FlakyStorage {
    pub fn failing_on(inner: Arc<MemoryStorage>, generation: &str) -> Self {
        Self {
            inner,
            fail_delete: generation.to_string(),
        }
    }
}

#[async_trait]
impl CacheStorage for FlakyStorage {
    async fn open(&self, generation: &str) -> OffcacheResult<Arc<dyn CacheGeneration>> {
        self.inner.open(generation).await
    }

    async fn generations(&self) -> OffcacheResult<Vec<String>> {
        self.inner.generations().await
    }

    async fn delete(&self, generation: &str) -> OffcacheResult<bool> {
        if generation == self.fail_delete {
            return Err(OffcacheError::StorageUnavailable(format!(
                "simulated delete failure for {}",
                generation
            )));
        }
        self.inner.delete(generation).await
    }
}

/// Poll until the background cache write for `key` lands, or give up
pub async fn wait_for_cached(
    storage: &Arc<MemoryStorage>,
    version: &str,
    key: &CacheKey,
    body: &str,
) -> Option<Response> {
    for _ in 0..200 {
        let generation = storage.open(version).await.unwrap();
        if let Some(response) = generation.get(key).await.unwrap() {
            if response.body_text() == body {
                return Some(response);
            }
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    None
}

/// A worker wired to fakes, with handles kept for inspection
pub struct TestHost {
    pub storage: Arc<MemoryStorage>,
    pub network: Arc<FakeNetwork>,
    pub control: Arc<RecordingControl>,
    pub worker: offcache::Worker,
}

impl TestHost {
    /// Worker with an explicit version and seed set
    pub fn with_version(version: &str, seeds: &[&str]) -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let network = Arc::new(FakeNetwork::new());
        let control = Arc::new(RecordingControl::default());
        let worker = offcache::Worker::new(
            Arc::clone(&storage) as Arc<dyn CacheStorage>,
            Arc::clone(&network) as Arc<dyn NetworkFetch>,
            Arc::clone(&control) as Arc<dyn HostControl>,
            version,
            seeds.iter().map(|s| s.to_string()).collect(),
        );
        Self {
            storage,
            network,
            control,
            worker,
        }
    }

    /// Worker using the crate's compiled-in version and seed set
    pub fn with_defaults() -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let network = Arc::new(FakeNetwork::new());
        let control = Arc::new(RecordingControl::default());
        let worker = offcache::Worker::with_defaults(
            Arc::clone(&storage) as Arc<dyn CacheStorage>,
            Arc::clone(&network) as Arc<dyn NetworkFetch>,
            Arc::clone(&control) as Arc<dyn HostControl>,
        );
        Self {
            storage,
            network,
            control,
            worker,
        }
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
