//! In-process [`EventBus`] implementation.

use netrequest_core::{EventBus, EventHandler, EventKind, ListenerId, ListenerOptions, RequestEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

struct Listener {
    id: ListenerId,
    kind: EventKind,
    handler: EventHandler,
    once: bool,
}

/// Listener registry that delivers events synchronously, in subscription
/// order, on the publishing task.
///
/// Handlers run after the registry lock is released, so a handler may
/// subscribe, unsubscribe or publish without deadlocking.
///
/// # Example
///
/// ```
/// use netrequest_core::{EventBus, EventKind, ListenerOptions};
/// use netrequest_runtime::LocalEventBus;
/// use std::sync::Arc;
///
/// let bus = LocalEventBus::new();
/// let id = bus.subscribe(EventKind::Success, Arc::new(|_| {}), ListenerOptions::default());
/// assert_eq!(bus.listener_count(), 1);
/// assert!(bus.unsubscribe(id));
/// ```
pub struct LocalEventBus {
    listeners: RwLock<Vec<Listener>>,
    next_id: AtomicU64,
}

impl LocalEventBus {
    /// Create an empty bus.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for LocalEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LocalEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalEventBus")
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}

impl EventBus for LocalEventBus {
    fn subscribe(&self, kind: EventKind, handler: EventHandler, options: ListenerOptions) -> ListenerId {
        let id = ListenerId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Listener {
                id,
                kind,
                handler,
                once: options.once,
            });
        tracing::trace!(listener = id.get(), %kind, once = options.once, "Listener subscribed");
        id
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|listener| listener.id != id);
        before != listeners.len()
    }

    fn publish(&self, event: RequestEvent) {
        let kind = event.kind();
        let handlers: Vec<EventHandler> = {
            let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
            let handlers = listeners
                .iter()
                .filter(|listener| listener.kind == kind)
                .map(|listener| listener.handler.clone())
                .collect();
            listeners.retain(|listener| !(listener.once && listener.kind == kind));
            handlers
        };

        tracing::trace!(%kind, listeners = handlers.len(), "Publishing event");
        for handler in handlers {
            handler(&event);
        }
    }
}
