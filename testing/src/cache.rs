//! Recording cache store.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)]

use netrequest_core::cache::CacheFuture;
use netrequest_core::{CacheError, CacheKey, CacheStore, RequestDescriptor, Response};
use std::sync::{Arc, Mutex};

/// Cache store that records every write, optionally refusing them.
///
/// Complements `InMemoryCacheStore` with write counting and failure
/// injection, so tests can assert exactly how often a controller caches.
#[derive(Clone, Debug, Default)]
pub struct RecordingCacheStore {
    writes: Arc<Mutex<Vec<(CacheKey, Response)>>>,
    fail: bool,
}

impl RecordingCacheStore {
    /// A store that accepts every write.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that records writes but reports each one as failed.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Number of writes attempted.
    #[must_use]
    pub fn put_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    /// Every write attempted, in order.
    #[must_use]
    pub fn writes(&self) -> Vec<(CacheKey, Response)> {
        self.writes.lock().unwrap().clone()
    }
}

impl CacheStore for RecordingCacheStore {
    fn put(&self, descriptor: RequestDescriptor, response: Response) -> CacheFuture<'_> {
        let key = descriptor.cache_key();
        self.writes.lock().unwrap().push((key.clone(), response));
        let fail = self.fail;

        Box::pin(async move {
            if fail {
                return Err(CacheError::WriteFailed {
                    key,
                    reason: "refused by test store".to_string(),
                });
            }
            Ok(())
        })
    }
}
