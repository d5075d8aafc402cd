//! Error types for offcache
//!
//! All modules use `OffcacheResult<T>` as their return type.

use thiserror::Error;

/// Result type alias for offcache operations
pub type OffcacheResult<T> = Result<T, OffcacheError>;

/// All errors that can occur in offcache
#[derive(Error, Debug)]
pub enum OffcacheError {
    // Install errors
    #[error("Seed fetch failed for {url}: {reason}")]
    SeedFetch { url: String, reason: String },

    // Network errors
    #[error("Network fetch failed for {url}: {reason}")]
    NetworkFetch { url: String, reason: String },

    // Store errors
    #[error("Failed to open cache generation {generation}: {reason}")]
    GenerationOpen { generation: String, reason: String },

    #[error("Cache storage unavailable: {0}")]
    StorageUnavailable(String),

    // Host errors
    #[error("Host control signal {signal} failed: {reason}")]
    HostSignal { signal: &'static str, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OffcacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a seed fetch error
    pub fn seed_fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SeedFetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a network fetch error
    pub fn network(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NetworkFetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Check if error is retryable
    ///
    /// Install-path failures are retryable: the host retries installation
    /// from scratch on the next opportunity.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::SeedFetch { .. } | Self::NetworkFetch { .. } | Self::StorageUnavailable(_)
        )
    }
}
