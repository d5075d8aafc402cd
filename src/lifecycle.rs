//! Install and activate lifecycle operations
//!
//! Provisions the current cache generation on install and garbage-collects
//! stale generations on activate. The host dispatches each event once per
//! deployed version and polls the returned future to completion, so the
//! event stays open until the whole sequence finishes.

use crate::error::{OffcacheError, OffcacheResult};
use crate::host::{HostControl, NetworkFetch};
use crate::http::{CacheKey, Request, Response};
use crate::store::CacheStorage;
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Provisions and garbage-collects cache generations
///
/// The lifecycle manager is the only writer that creates or deletes
/// generations; entry population within the current generation belongs to
/// the fetch interceptor.
pub struct LifecycleManager {
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn NetworkFetch>,
    control: Arc<dyn HostControl>,
    version: String,
    seed_urls: Vec<String>,
}

impl LifecycleManager {
    pub fn new(
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn NetworkFetch>,
        control: Arc<dyn HostControl>,
        version: impl Into<String>,
        seed_urls: Vec<String>,
    ) -> Self {
        Self {
            storage,
            fetcher,
            control,
            version: version.into(),
            seed_urls,
        }
    }

    /// Install: seed the current generation from the network.
    ///
    /// All-or-nothing over the seed set: every URL is fetched before
    /// anything is written, and any fetch failure fails the whole install.
    /// The host retries installation from scratch on the next opportunity.
    /// Re-opening an existing generation with the same version is not an
    /// error; the seeds are simply overwritten.
    pub async fn install(&self) -> OffcacheResult<()> {
        info!("Installing cache generation {}", self.version);
        let generation = self.storage.open(&self.version).await?;

        // Fetch the whole seed set before writing anything
        let requests: Vec<Request> = self.seed_urls.iter().map(|url| Request::get(url)).collect();
        let fetches = join_all(requests.iter().map(|r| self.fetcher.fetch(r))).await;

        let mut seeded: Vec<(CacheKey, Response)> = Vec::with_capacity(requests.len());
        for (request, result) in requests.iter().zip(fetches) {
            match result {
                Ok(response) => seeded.push((request.key(), response)),
                Err(e) => return Err(OffcacheError::seed_fetch(&request.url, e.to_string())),
            }
        }

        for (key, response) in seeded {
            generation.put(key, response).await?;
        }
        debug!(
            "Seeded {} entries into generation {}",
            self.seed_urls.len(),
            self.version
        );

        self.control.skip_waiting().await?;
        info!("Install complete for {}", self.version);
        Ok(())
    }

    /// Activate: delete every generation other than the current one, then
    /// claim open pages.
    ///
    /// Deletions run in parallel; completion gates on the slowest. An
    /// individual deletion failure is logged and skipped, leaving that
    /// stale generation for a later activation. Zero prior generations is
    /// a no-op.
    pub async fn activate(&self) -> OffcacheResult<()> {
        info!("Activating cache generation {}", self.version);

        let stale: Vec<String> = self
            .storage
            .generations()
            .await?
            .into_iter()
            .filter(|g| g != &self.version)
            .collect();

        let results = join_all(stale.iter().map(|g| self.storage.delete(g))).await;
        for (generation, result) in stale.iter().zip(results) {
            match result {
                Ok(_) => debug!("Deleted stale generation {}", generation),
                Err(e) => warn!("Failed to delete stale generation {}: {}", generation, e),
            }
        }

        // Pages claimed only after the deletion pass has fully completed
        self.control.claim_clients().await?;
        info!("Activate complete for {}", self.version);
        Ok(())
    }
}
