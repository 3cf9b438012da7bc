//! Response cache abstraction.
//!
//! Caching is best-effort: the controller writes settled responses to the
//! [`CacheStore`] in the background and only logs failures.

use crate::config::Method;
use crate::descriptor::RequestDescriptor;
use crate::response::Response;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors a cache store may report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The store is not reachable
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// The write was refused
    #[error("Cache write failed for {key}: {reason}")]
    WriteFailed {
        /// Key that failed to be written
        key: CacheKey,
        /// Reason given by the store
        reason: String,
    },
}

/// Identity of a cached response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    method: Method,
    url: String,
}

impl CacheKey {
    /// Create a key.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
        }
    }

    /// HTTP method
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Future returned by [`CacheStore::put`].
pub type CacheFuture<'a> = Pin<Box<dyn Future<Output = Result<(), CacheError>> + Send + 'a>>;

/// Keyed store for settled responses.
pub trait CacheStore: Send + Sync {
    /// Store `response` under the key of `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the write fails. Controllers suppress it.
    fn put(&self, descriptor: RequestDescriptor, response: Response) -> CacheFuture<'_>;
}

/// A cache store that discards every write.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopCacheStore;

impl CacheStore for NoopCacheStore {
    fn put(&self, _descriptor: RequestDescriptor, _response: Response) -> CacheFuture<'_> {
        Box::pin(async { Ok(()) })
    }
}
