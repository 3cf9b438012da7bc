//! Span capture for assertions on instrumentation.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)]

use std::sync::{Arc, Mutex};
use tracing::span::{Attributes, Id};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// `tracing` layer that records the name of every span opened under it.
///
/// # Example
///
/// ```ignore
/// let spans = SpanRecorder::new();
/// let _guard = tracing::subscriber::set_default(spans.subscriber());
/// controller.send();
/// assert!(spans.contains("send"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct SpanRecorder {
    names: Arc<Mutex<Vec<&'static str>>>,
}

impl SpanRecorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A subscriber that only feeds this recorder.
    #[must_use]
    pub fn subscriber(&self) -> impl Subscriber + Send + Sync + 'static {
        tracing_subscriber::registry().with(self.clone())
    }

    /// Names of every recorded span, in creation order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.names.lock().unwrap().clone()
    }

    /// Whether a span called `name` was opened.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.lock().unwrap().iter().any(|recorded| *recorded == name)
    }
}

impl<S: Subscriber> Layer<S> for SpanRecorder {
    fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
        self.names.lock().unwrap().push(attrs.metadata().name());
    }
}
