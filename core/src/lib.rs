//! # netrequest Core
//!
//! Core types and collaborator traits for the netrequest lifecycle controller.
//!
//! This crate holds everything a controller and its collaborators agree on:
//!
//! - **Configuration**: [`RequestConfig`] and its single-field [`RequestOption`]s
//! - **Descriptor**: the immutable per-attempt [`RequestDescriptor`] and its
//!   [`AbortSignal`]
//! - **Hooks**: [`HookOutcome`] based before/after interception
//! - **Collaborators**: [`Transport`], [`CacheStore`] and [`EventBus`]
//! - **State**: [`LifecycleState`] and the [`ControllerError`] taxonomy
//!
//! The controller itself lives in `netrequest-runtime`.

pub mod cache;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod event_bus;
pub mod hook;
pub mod response;
pub mod state;
pub mod transport;

pub use cache::{CacheError, CacheKey, CacheStore, NoopCacheStore};
pub use config::{Headers, Method, Mode, OptionKey, RequestConfig, RequestOption};
pub use descriptor::{AbortController, AbortSignal, RequestDescriptor};
pub use error::ControllerError;
pub use event_bus::{
    EventBus, EventHandler, EventKind, FailedEvent, ListenerId, ListenerOptions, RequestEvent,
    SuccessEvent,
};
pub use hook::{AfterHook, BeforeHook, HookOutcome};
pub use response::{RequestResult, Response};
pub use state::{ControllerId, LifecycleState};
pub use transport::{Transport, TransportError};
