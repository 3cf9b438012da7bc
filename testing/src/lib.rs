//! # netrequest Testing
//!
//! Testing utilities and fakes for the netrequest controller.
//!
//! This crate provides:
//! - [`MockTransport`]: scripted transport that records its calls
//! - [`RecordingCacheStore`]: cache store with write counting and failure injection
//! - [`EventRecorder`]: captures published events
//! - [`SpanRecorder`]: captures opened `tracing` spans
//! - Response fixtures and a tracing initializer for test output
//!
//! ## Example
//!
//! ```ignore
//! use netrequest_testing::{EventRecorder, MockTransport, ok_response};
//!
//! #[tokio::test]
//! async fn fulfils() {
//!     let transport = Arc::new(MockTransport::responding(ok_response("/a", "hi")));
//!     let controller = RequestController::new(
//!         RequestConfig::builder("/a").build(),
//!         ControllerEnvironment::new(transport.clone()),
//!     )
//!     .unwrap();
//!
//!     let ready = controller.ready();
//!     controller.send();
//!     ready.wait().await.unwrap();
//!     assert_eq!(controller.state(), LifecycleState::Fulfilled);
//! }
//! ```

use netrequest_core::{Headers, Response};

pub mod cache;
pub mod events;
pub mod spans;
pub mod transport;

pub use cache::RecordingCacheStore;
pub use events::EventRecorder;
pub use spans::SpanRecorder;
pub use transport::{MockReply, MockTransport};

/// A `200 OK` response for `url` with a text body.
#[must_use]
pub fn ok_response(url: &str, body: &str) -> Response {
    response(200, url, body)
}

/// A response with the given status and text body.
#[must_use]
pub fn response(status: u16, url: &str, body: &str) -> Response {
    let mut headers = Headers::new();
    headers.insert("content-type".to_string(), "text/plain".to_string());
    Response::new(status, url, headers, body.as_bytes().to_vec())
}

/// A `200 OK` response for `url` with a JSON body.
#[must_use]
pub fn json_response(url: &str, body: &serde_json::Value) -> Response {
    let mut headers = Headers::new();
    headers.insert("content-type".to_string(), "application/json".to_string());
    Response::new(200, url, headers, body.to_string().into_bytes())
}

/// Install a `tracing` subscriber honoring `RUST_LOG`, once per process.
///
/// Output goes through the test writer so it is captured per test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
