//! Request descriptors and cancellation handles.
//!
//! A [`RequestDescriptor`] is the immutable snapshot of one send attempt. It is
//! rebuilt from the [`RequestConfig`] whenever the controller re-arms, and
//! carries the [`AbortSignal`] of the [`AbortController`] created alongside it.
//! Before-hooks derive new descriptors through the consuming `with_*` methods.

use crate::cache::CacheKey;
use crate::config::{Headers, Method, Mode, RequestConfig};
use tokio::sync::watch;

/// Owning side of a cancellation handle.
///
/// Each controller re-arm creates a fresh `AbortController`; triggering one
/// never affects the signals of a later attempt.
#[derive(Debug)]
pub struct AbortController {
    tx: watch::Sender<bool>,
}

impl AbortController {
    /// Create a controller whose signal has not fired.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// A signal observing this controller.
    #[must_use]
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Fire the signal. Idempotent.
    pub fn abort(&self) {
        self.tx.send_replace(true);
    }

    /// Whether [`abort`](Self::abort) has been called.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}

/// Observing side of a cancellation handle, handed to the transport.
///
/// Cancellation is cooperative: a transport has to watch the signal for an
/// in-flight call to actually stop.
#[derive(Clone, Debug)]
pub struct AbortSignal {
    rx: watch::Receiver<bool>,
}

impl AbortSignal {
    /// A signal that never fires.
    #[must_use]
    pub fn never() -> Self {
        AbortController::new().signal()
    }

    /// Whether the signal has fired.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once the signal fires.
    ///
    /// If the owning [`AbortController`] is dropped without firing, this
    /// future never resolves.
    pub async fn aborted(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|aborted| *aborted).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Immutable description of a single send attempt.
#[derive(Clone, Debug)]
pub struct RequestDescriptor {
    method: Method,
    mode: Mode,
    url: String,
    headers: Headers,
    body: Option<Vec<u8>>,
    signal: AbortSignal,
}

impl RequestDescriptor {
    /// Build a descriptor from a configuration and the signal of a fresh
    /// [`AbortController`].
    #[must_use]
    pub fn from_config(config: &RequestConfig, signal: AbortSignal) -> Self {
        Self {
            method: config.method,
            mode: config.mode,
            url: config.url.clone(),
            headers: config.headers.clone(),
            body: config.body.clone(),
            signal,
        }
    }

    /// HTTP method
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Cross-origin mode
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Target URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request headers
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Request body
    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Cancellation signal of this attempt
    #[must_use]
    pub const fn signal(&self) -> &AbortSignal {
        &self.signal
    }

    /// Key under which a response to this descriptor is cached.
    #[must_use]
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(self.method, self.url.clone())
    }

    /// Derive a descriptor with a different method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Derive a descriptor with a different mode.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Derive a descriptor with a different URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Derive a descriptor with an added or replaced header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Derive a descriptor with a different body.
    #[must_use]
    pub fn with_body(mut self, body: Option<Vec<u8>>) -> Self {
        self.body = body;
        self
    }
}
