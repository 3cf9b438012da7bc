//! The controller's ready handle.
//!
//! Every re-arm of a controller creates a new [`ReadySlot`]. Handles taken
//! from an older slot keep whatever that slot resolved to; if it was never
//! resolved they report [`ControllerError::Superseded`] instead of ever seeing
//! a newer attempt's result.

use netrequest_core::{ControllerError, RequestResult};
use tokio::sync::watch;

type Slot = Option<Option<RequestResult>>;

#[derive(Debug)]
pub(crate) struct ReadySlot {
    tx: watch::Sender<Slot>,
}

impl ReadySlot {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub(crate) fn handle(&self) -> Ready {
        Ready {
            rx: self.tx.subscribe(),
        }
    }

    /// Resolve the slot. Only the first call has an effect.
    pub(crate) fn resolve(&self, result: Option<RequestResult>) -> bool {
        self.tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(result);
            true
        })
    }
}

/// Awaitable view of the current attempt cycle's eventual result.
///
/// Resolves after settlement whether the attempt succeeded or not; inspect the
/// controller's state or listen for `failed` events to tell the two apart.
#[derive(Clone, Debug)]
pub struct Ready {
    rx: watch::Receiver<Slot>,
}

impl Ready {
    /// Wait for the result.
    ///
    /// Yields `Ok(None)` when the attempt failed before any attempt of this
    /// controller ever succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Superseded`] if the controller re-armed
    /// before this cycle resolved.
    pub async fn wait(mut self) -> Result<Option<RequestResult>, ControllerError> {
        let outcome = self
            .rx
            .wait_for(Option::is_some)
            .await
            .map(|slot| slot.clone().flatten())
            .map_err(|_| ControllerError::Superseded);
        outcome
    }

    /// Whether the cycle has resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.rx.borrow().is_some()
    }
}
