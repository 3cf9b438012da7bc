//! Scripted transport for controller tests.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)]

use netrequest_core::transport::TransportFuture;
use netrequest_core::{AbortSignal, RequestDescriptor, Response, Transport, TransportError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How a [`MockTransport`] settles a call.
#[derive(Clone, Debug)]
pub enum MockReply {
    /// Resolve immediately
    Respond(Response),
    /// Resolve after a delay
    RespondAfter(Duration, Response),
    /// Reject immediately
    Fail(TransportError),
    /// Reject after a delay
    FailAfter(Duration, TransportError),
    /// Never settle unless aborted
    Hang,
}

/// Transport that replays scripted replies and records every call.
///
/// Queued replies are used first, in order; once the queue is empty every
/// call gets the fallback reply. All replies honor the abort signal.
///
/// # Example
///
/// ```
/// use netrequest_testing::{MockReply, MockTransport, ok_response};
///
/// let transport = MockTransport::hanging();
/// transport.push(MockReply::Respond(ok_response("/a", "done")));
/// assert_eq!(transport.call_count(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct MockTransport {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    fallback: MockReply,
    calls: Arc<Mutex<Vec<RequestDescriptor>>>,
}

impl MockTransport {
    /// A transport whose calls settle with `fallback` unless a reply is queued.
    #[must_use]
    pub fn new(fallback: MockReply) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            fallback,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every call resolves with `response`.
    #[must_use]
    pub fn responding(response: Response) -> Self {
        Self::new(MockReply::Respond(response))
    }

    /// Every call rejects with `error`.
    #[must_use]
    pub fn failing(error: TransportError) -> Self {
        Self::new(MockReply::Fail(error))
    }

    /// Every call hangs until aborted.
    #[must_use]
    pub fn hanging() -> Self {
        Self::new(MockReply::Hang)
    }

    /// Queue a reply for the next unanswered call.
    pub fn push(&self, reply: MockReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Descriptors of every call so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RequestDescriptor> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Descriptor of the most recent call.
    #[must_use]
    pub fn last_call(&self) -> Option<RequestDescriptor> {
        self.calls.lock().unwrap().last().cloned()
    }

    fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Transport for MockTransport {
    fn execute(&self, descriptor: RequestDescriptor, signal: AbortSignal) -> TransportFuture<'_> {
        self.calls.lock().unwrap().push(descriptor);
        let reply = self.next_reply();

        Box::pin(async move {
            let settle = async move {
                match reply {
                    MockReply::Respond(response) => Ok(response),
                    MockReply::RespondAfter(delay, response) => {
                        tokio::time::sleep(delay).await;
                        Ok(response)
                    }
                    MockReply::Fail(error) => Err(error),
                    MockReply::FailAfter(delay, error) => {
                        tokio::time::sleep(delay).await;
                        Err(error)
                    }
                    MockReply::Hang => std::future::pending().await,
                }
            };

            tokio::select! {
                biased;
                () = signal.aborted() => Err(TransportError::Aborted),
                outcome = settle => outcome,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ok_response;
    use netrequest_core::{AbortController, RequestConfig};

    fn descriptor(signal: AbortSignal) -> RequestDescriptor {
        RequestDescriptor::from_config(&RequestConfig::builder("/a").build(), signal)
    }

    #[tokio::test]
    async fn queued_replies_precede_fallback() {
        let transport = MockTransport::failing(TransportError::Network("down".into()));
        transport.push(MockReply::Respond(ok_response("/a", "first")));

        let first = transport.execute(descriptor(AbortSignal::never()), AbortSignal::never()).await;
        let second = transport.execute(descriptor(AbortSignal::never()), AbortSignal::never()).await;

        assert_eq!(first.unwrap().text(), "first");
        assert_eq!(second, Err(TransportError::Network("down".into())));
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn hang_rejects_on_abort() {
        let transport = MockTransport::hanging();
        let abort = AbortController::new();
        let signal = abort.signal();

        let call = transport.execute(descriptor(signal.clone()), signal);
        abort.abort();

        assert_eq!(call.await, Err(TransportError::Aborted));
    }
}
