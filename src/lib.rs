//! Offcache - Generation-based offline cache
//!
//! Intercepts same-origin requests and serves previously-seen responses
//! from a local cache when the network is unavailable, evicting stale
//! cache generations on upgrade.

pub mod error;
pub mod host;
pub mod http;
pub mod interceptor;
pub mod lifecycle;
pub mod store;
pub mod worker;

pub use error::{OffcacheError, OffcacheResult};
pub use interceptor::FetchOutcome;
pub use worker::Worker;

/// Version string identifying the current cache generation.
pub const CACHE_VERSION: &str = "portfolio-v1";

/// URLs pre-populated into the current generation at install time.
pub const SEED_URLS: &[&str] = &["/"];
