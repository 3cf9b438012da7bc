//! # netrequest Runtime
//!
//! The request lifecycle controller.
//!
//! This crate provides [`RequestController`], which wraps one network fetch
//! with state tracking, cancellation, timeout-triggered abort, manual retry,
//! before/after hooks, event notification and optional response caching.
//!
//! ## Core Components
//!
//! - **RequestController**: owns the configuration, hooks, timers and state
//! - **ControllerEnvironment**: the injected transport, cache store and event bus
//! - **Ready**: awaitable handle on the current attempt cycle
//! - **LocalEventBus**: default in-process event bus
//! - **InMemoryCacheStore**: process-local response cache
//!
//! ## Example
//!
//! ```ignore
//! use netrequest_core::{EventKind, ListenerOptions, RequestConfig};
//! use netrequest_runtime::{ControllerEnvironment, RequestController};
//!
//! let controller = RequestController::new(
//!     RequestConfig::builder("https://example.com/a").build(),
//!     ControllerEnvironment::new(transport),
//! )?;
//!
//! controller.on(EventKind::Failed, |event| tracing::warn!(?event), ListenerOptions::default());
//!
//! let ready = controller.ready();
//! controller.send();
//! let result = ready.wait().await?;
//! ```

/// The lifecycle controller
pub mod controller;

/// Injected collaborators
pub mod environment;

/// In-process event bus
pub mod event_bus;

/// In-memory response cache
pub mod cache;

/// Ready handles
pub mod ready;

mod timers;

pub use cache::InMemoryCacheStore;
pub use controller::RequestController;
pub use environment::ControllerEnvironment;
pub use event_bus::LocalEventBus;
pub use ready::Ready;
