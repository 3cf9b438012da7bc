//! Event bus abstraction for controller notifications.
//!
//! A controller does not emit events itself; it holds an [`EventBus`] and
//! publishes a [`RequestEvent`] after every settlement. Listeners register
//! through the controller's `on`, which delegates straight to the bus.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐   settle    ┌──────────────┐   publish   ┌───────────┐
//! │   Transport    │────────────►│  Controller  │────────────►│ Event Bus │
//! └────────────────┘             └──────────────┘             └─────┬─────┘
//!                                                                   │
//!                                                              ┌────┴────┐
//!                                                              ▼         ▼
//!                                                          success    failed
//!                                                          handlers   handlers
//! ```
//!
//! # Delivery
//!
//! - **Synchronous**: handlers run inside `publish`, in subscription order
//! - **Exactly once per settlement**: one event per settled attempt
//! - **Filtered by kind**: a handler only sees events of the kind it subscribed to
//!
//! # Implementations
//!
//! - `LocalEventBus` (in `netrequest-runtime`): in-process listener registry
//!
//! # Example
//!
//! ```rust,ignore
//! use netrequest_core::event_bus::{EventKind, ListenerOptions};
//!
//! let id = controller.on(
//!     EventKind::Failed,
//!     Arc::new(|event| tracing::warn!(?event, "request failed")),
//!     ListenerOptions::default(),
//! );
//! ```

use crate::descriptor::RequestDescriptor;
use crate::response::RequestResult;
use crate::state::ControllerId;
use crate::transport::TransportError;
use std::fmt;
use std::sync::Arc;

/// Kinds of events a controller publishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// An attempt settled successfully
    Success,
    /// An attempt was rejected
    Failed,
}

impl EventKind {
    /// Event name as listeners know it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Published when the transport resolves and after-hooks have run.
#[derive(Clone, Debug)]
pub struct SuccessEvent {
    /// Final result after all after-hooks
    pub result: RequestResult,
    /// Controller that published the event
    pub sender: ControllerId,
}

/// Published when the transport rejects, including abort-triggered rejections.
#[derive(Clone, Debug)]
pub struct FailedEvent {
    /// Rejection reason
    pub error: TransportError,
    /// Descriptor the failed attempt was sent with
    pub descriptor: RequestDescriptor,
    /// Controller that published the event
    pub sender: ControllerId,
}

/// An event published by a controller.
#[derive(Clone, Debug)]
pub enum RequestEvent {
    /// See [`SuccessEvent`]
    Success(SuccessEvent),
    /// See [`FailedEvent`]
    Failed(FailedEvent),
}

impl RequestEvent {
    /// Kind of this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Success(_) => EventKind::Success,
            Self::Failed(_) => EventKind::Failed,
        }
    }

    /// Controller that published the event.
    #[must_use]
    pub const fn sender(&self) -> ControllerId {
        match self {
            Self::Success(event) => event.sender,
            Self::Failed(event) => event.sender,
        }
    }
}

/// Identifier returned by [`EventBus::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Subscription options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Remove the listener after its first delivery
    pub once: bool,
}

impl ListenerOptions {
    /// Options for a listener that fires once.
    #[must_use]
    pub const fn once() -> Self {
        Self { once: true }
    }
}

/// Handler invoked for each matching event.
pub type EventHandler = Arc<dyn Fn(&RequestEvent) + Send + Sync>;

/// Publish/subscribe capability a controller composes.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; a controller publishes from the
/// task that observed the transport settlement.
pub trait EventBus: Send + Sync {
    /// Register `handler` for events of `kind`.
    fn subscribe(&self, kind: EventKind, handler: EventHandler, options: ListenerOptions) -> ListenerId;

    /// Remove a listener. Returns `false` if it was not registered.
    fn unsubscribe(&self, id: ListenerId) -> bool;

    /// Deliver `event` to every listener subscribed to its kind.
    fn publish(&self, event: RequestEvent);
}
