//! Per-request routing between network and cache
//!
//! Network-first with cache fallback: a live network always wins, so users
//! see fresh content when online, and the cache is a resilience layer for
//! offline or flaky conditions rather than a performance optimization.

use crate::error::OffcacheResult;
use crate::host::NetworkFetch;
use crate::http::{CacheKey, Request, Response};
use crate::store::CacheStorage;
use std::sync::Arc;
use tracing::debug;

/// Requests whose URL contains this marker bypass the interceptor
/// entirely. API responses are assumed dynamic and must never be served
/// stale.
pub const API_BYPASS_MARKER: &str = "/api/";

/// Outcome of handling one intercepted request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Excluded request; the host performs default network handling with
    /// no caching involvement.
    Passthrough,
    /// A response produced from the network or the cache.
    Response(Response),
    /// Network failed and no cached entry exists for the key. There is no
    /// further fallback; the request ends empty.
    Miss,
}

/// Routes intercepted requests between network and cache
///
/// The interceptor is the only writer of entries within the current
/// generation; it never creates or deletes generations beyond the
/// create-if-absent open of the current one.
pub struct FetchInterceptor {
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn NetworkFetch>,
    version: String,
}

impl FetchInterceptor {
    pub fn new(
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn NetworkFetch>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            fetcher,
            version: version.into(),
        }
    }

    /// Whether a URL is excluded from interception
    pub fn is_excluded(url: &str) -> bool {
        url.contains(API_BYPASS_MARKER)
    }

    /// Handle one intercepted request
    ///
    /// Network success (any status) returns the network response and
    /// persists a duplicate in the background. Network failure falls back
    /// to the cache; a fallback miss is surfaced as [`FetchOutcome::Miss`].
    pub async fn handle(&self, request: &Request) -> OffcacheResult<FetchOutcome> {
        if Self::is_excluded(&request.url) {
            return Ok(FetchOutcome::Passthrough);
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                self.store_best_effort(request.key(), response.clone());
                Ok(FetchOutcome::Response(response))
            }
            Err(e) => {
                debug!("Network failed for {}, falling back to cache: {}", request.url, e);
                let generation = self.storage.open(&self.version).await?;
                match generation.get(&request.key()).await? {
                    Some(cached) => Ok(FetchOutcome::Response(cached)),
                    None => Ok(FetchOutcome::Miss),
                }
            }
        }
    }

    /// Persist a response in the background without blocking the caller.
    ///
    /// Best-effort: a write failure is dropped, never surfaced to the
    /// caller or retried. Caching is an optimization here, not a
    /// correctness requirement for the online path.
    fn store_best_effort(&self, key: CacheKey, response: Response) {
        let storage = Arc::clone(&self.storage);
        let version = self.version.clone();
        let url = key.url.clone();

        tokio::spawn(async move {
            let result: OffcacheResult<()> = async {
                let generation = storage.open(&version).await?;
                generation.put(key, response).await
            }
            .await;

            if let Err(e) = result {
                debug!("Dropping failed cache write for {}: {}", url, e);
            }
        });
    }
}
