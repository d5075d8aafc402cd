//! Event entry points
//!
//! One handler per host event: install, activate, fetch. Each handler is
//! an independent async entry point; the host polls the returned future to
//! completion, which is what holds the triggering event open. No
//! in-process state persists between invocations beyond the store itself.

use crate::error::OffcacheResult;
use crate::host::{HostControl, NetworkFetch};
use crate::http::Request;
use crate::interceptor::{FetchInterceptor, FetchOutcome};
use crate::lifecycle::LifecycleManager;
use crate::store::CacheStorage;
use std::sync::Arc;

/// The worker the host registers: lifecycle manager plus fetch interceptor
/// sharing one cache generation identifier.
pub struct Worker {
    lifecycle: LifecycleManager,
    interceptor: FetchInterceptor,
}

impl Worker {
    pub fn new(
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn NetworkFetch>,
        control: Arc<dyn HostControl>,
        version: impl Into<String>,
        seed_urls: Vec<String>,
    ) -> Self {
        let version = version.into();
        Self {
            lifecycle: LifecycleManager::new(
                Arc::clone(&storage),
                Arc::clone(&fetcher),
                control,
                version.clone(),
                seed_urls,
            ),
            interceptor: FetchInterceptor::new(storage, fetcher, version),
        }
    }

    /// Construct with the compiled-in version and seed set
    pub fn with_defaults(
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn NetworkFetch>,
        control: Arc<dyn HostControl>,
    ) -> Self {
        Self::new(
            storage,
            fetcher,
            control,
            crate::CACHE_VERSION,
            crate::SEED_URLS.iter().map(|s| s.to_string()).collect(),
        )
    }

    /// Dispatched once when this version is first registered
    pub async fn on_install(&self) -> OffcacheResult<()> {
        self.lifecycle.install().await
    }

    /// Dispatched once when this version transitions to serving
    pub async fn on_activate(&self) -> OffcacheResult<()> {
        self.lifecycle.activate().await
    }

    /// Dispatched for every intercepted request
    pub async fn on_fetch(&self, request: &Request) -> OffcacheResult<FetchOutcome> {
        self.interceptor.handle(request).await
    }
}
