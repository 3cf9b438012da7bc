//! In-memory [`CacheStore`] implementation.

use netrequest_core::cache::CacheFuture;
use netrequest_core::{CacheKey, CacheStore, RequestDescriptor, Response};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Process-local response cache keyed by method and URL.
///
/// Later writes for the same key replace earlier ones. Cloning shares the
/// underlying map.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCacheStore {
    entries: Arc<RwLock<HashMap<CacheKey, Response>>>,
}

impl InMemoryCacheStore {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached response for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<Response> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Number of cached responses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl CacheStore for InMemoryCacheStore {
    fn put(&self, descriptor: RequestDescriptor, response: Response) -> CacheFuture<'_> {
        Box::pin(async move {
            let key = descriptor.cache_key();
            tracing::trace!(%key, status = response.status(), "Caching response");
            self.entries
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key, response);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use netrequest_core::{AbortSignal, Headers, Method, RequestConfig};

    #[tokio::test]
    async fn put_then_get() {
        let cache = InMemoryCacheStore::new();
        let config = RequestConfig::builder("/items").build();
        let descriptor = RequestDescriptor::from_config(&config, AbortSignal::never());
        let response = Response::new(200, "/items", Headers::new(), b"[]".to_vec());

        cache.put(descriptor, response.clone()).await.unwrap();

        assert_eq!(cache.get(&CacheKey::new(Method::Get, "/items")), Some(response));
        assert!(cache.get(&CacheKey::new(Method::Post, "/items")).is_none());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
