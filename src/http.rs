//! Request and response value types
//!
//! A request is identified by method plus URL; a response is the full
//! representation stored in the cache (status, headers, body). Cloning a
//! `Response` is how one body gets returned to the caller while a copy is
//! persisted.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An intercepted request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// HTTP method, uppercase
    pub method: String,
    /// Absolute or root-relative URL
    pub url: String,
}

impl Request {
    /// Create a request with an explicit method
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into().to_uppercase(),
            url: url.into(),
        }
    }

    /// Create a GET request (the common case for intercepted traffic)
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    /// Cache key identifying this request
    pub fn key(&self) -> CacheKey {
        CacheKey::from(self)
    }
}

/// A network or cached response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code (any status is storable, no filtering)
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    /// Create a response with the given status and empty body
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Create a 200 response with the given body
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Add a header, consuming and returning self
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, lossily
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Request identity used as the cache entry key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub method: String,
    pub url: String,
}

impl CacheKey {
    /// String form for backends whose underlying format wants string keys
    pub fn storage_key(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}

impl From<&Request> for CacheKey {
    fn from(request: &Request) -> Self {
        Self {
            method: request.method.clone(),
            url: request.url.clone(),
        }
    }
}
