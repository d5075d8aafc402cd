//! Host capability seams
//!
//! The hosting environment owns the network and the lifecycle control
//! signals. These traits are implemented by the embedder; tests use
//! scriptable fakes.

use crate::error::OffcacheResult;
use crate::http::{Request, Response};
use async_trait::async_trait;

/// Network fetch capability provided by the host
///
/// Any `Ok` counts as network success, including non-2xx statuses. Any
/// `Err` counts as network failure (offline, DNS, timeout). No internal
/// deadline is applied; timeouts and aborts are the host's concern.
#[async_trait]
pub trait NetworkFetch: Send + Sync {
    async fn fetch(&self, request: &Request) -> OffcacheResult<Response>;
}

/// Lifecycle control signals provided by the host
#[async_trait]
pub trait HostControl: Send + Sync {
    /// Ask the host to let this version supersede a waiting predecessor
    /// immediately instead of waiting for existing clients to close.
    async fn skip_waiting(&self) -> OffcacheResult<()>;

    /// Take control of already-open pages without requiring a reload.
    async fn claim_clients(&self) -> OffcacheResult<()>;
}
