//! Injected collaborators of a controller.

use crate::event_bus::LocalEventBus;
use netrequest_core::{CacheStore, EventBus, NoopCacheStore, Transport};
use std::sync::Arc;

/// The transport, cache store and event bus a controller works with.
///
/// # Example
///
/// ```ignore
/// let env = ControllerEnvironment::new(Arc::new(ReqwestTransport::new()))
///     .with_cache(Arc::new(InMemoryCacheStore::new()));
/// ```
#[derive(Clone)]
pub struct ControllerEnvironment {
    /// Performs the network fetch
    pub transport: Arc<dyn Transport>,
    /// Receives settled responses of cacheable requests
    pub cache: Arc<dyn CacheStore>,
    /// Delivers `success` and `failed` events
    pub events: Arc<dyn EventBus>,
}

impl ControllerEnvironment {
    /// An environment with no cache and a private [`LocalEventBus`].
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            cache: Arc::new(NoopCacheStore),
            events: Arc::new(LocalEventBus::new()),
        }
    }

    /// Use `cache` for cacheable responses.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = cache;
        self
    }

    /// Publish events on `events`.
    #[must_use]
    pub fn with_event_bus(mut self, events: Arc<dyn EventBus>) -> Self {
        self.events = events;
        self
    }
}

impl std::fmt::Debug for ControllerEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerEnvironment").finish_non_exhaustive()
    }
}
