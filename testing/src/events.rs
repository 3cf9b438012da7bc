//! Event capture for assertions.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)]

use netrequest_core::{EventKind, FailedEvent, RequestEvent, SuccessEvent};
use std::sync::{Arc, Mutex};

/// Collects the events delivered to the handlers it hands out.
///
/// # Example
///
/// ```ignore
/// let recorder = EventRecorder::new();
/// controller.on(EventKind::Success, recorder.handler(), ListenerOptions::default());
/// controller.on(EventKind::Failed, recorder.handler(), ListenerOptions::default());
/// ```
#[derive(Clone, Debug, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<RequestEvent>>>,
}

impl EventRecorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler that appends every event it receives to this recorder.
    pub fn handler(&self) -> impl Fn(&RequestEvent) + Send + Sync + 'static {
        let events = Arc::clone(&self.events);
        move |event| events.lock().unwrap().push(event.clone())
    }

    /// Every recorded event, in delivery order.
    #[must_use]
    pub fn events(&self) -> Vec<RequestEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Number of recorded events of `kind`.
    #[must_use]
    pub fn count(&self, kind: EventKind) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.kind() == kind)
            .count()
    }

    /// Recorded success events.
    #[must_use]
    pub fn successes(&self) -> Vec<SuccessEvent> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RequestEvent::Success(success) => Some(success),
                RequestEvent::Failed(_) => None,
            })
            .collect()
    }

    /// Recorded failure events.
    #[must_use]
    pub fn failures(&self) -> Vec<FailedEvent> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RequestEvent::Failed(failed) => Some(failed),
                RequestEvent::Success(_) => None,
            })
            .collect()
    }
}
