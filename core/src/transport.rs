//! Transport abstraction.
//!
//! The [`Transport`] performs the actual network I/O for a descriptor. The
//! controller never talks to the network itself; it hands the descriptor and
//! its [`AbortSignal`] to the transport and waits for the settlement.
//!
//! # Implementations
//!
//! - `ReqwestTransport` (in `netrequest-reqwest`): production HTTP client
//! - `MockTransport` (in `netrequest-testing`): scripted replies for tests
//!
//! # Example
//!
//! ```rust,ignore
//! let response = transport
//!     .execute(descriptor.clone(), descriptor.signal().clone())
//!     .await?;
//! ```

use crate::descriptor::{AbortSignal, RequestDescriptor};
use crate::response::Response;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Ways a transport call can reject.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The abort signal fired before the call settled
    #[error("Request aborted")]
    Aborted,

    /// Connection, DNS or protocol failure
    #[error("Network error: {0}")]
    Network(String),

    /// The descriptor could not be turned into a request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The response body could not be read
    #[error("Failed to read response body: {0}")]
    Body(String),
}

impl TransportError {
    /// Whether this rejection was caused by the abort signal.
    #[must_use]
    pub const fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }
}

/// Future returned by [`Transport::execute`].
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<Response, TransportError>> + Send + 'a>>;

/// Performs the network fetch for a request descriptor.
///
/// # Cancellation
///
/// Implementations must watch `signal` and reject with
/// [`TransportError::Aborted`] once it fires. The controller only signals
/// intent; it does not tear down in-flight calls itself.
///
/// # Dyn Compatibility
///
/// Uses an explicit boxed future so controllers can hold an
/// `Arc<dyn Transport>`.
pub trait Transport: Send + Sync {
    /// Execute `descriptor`, rejecting early if `signal` fires.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on network failure or cancellation.
    fn execute(&self, descriptor: RequestDescriptor, signal: AbortSignal) -> TransportFuture<'_>;
}
