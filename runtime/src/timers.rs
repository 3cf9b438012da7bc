//! Timer slots owned by a controller.
//!
//! A controller has at most one retry timer and one timeout timer alive at a
//! time. Arming a slot always aborts whatever task it held before.

use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub(crate) struct Timers {
    retry: Option<JoinHandle<()>>,
    timeout: Option<JoinHandle<()>>,
}

impl Timers {
    pub(crate) fn arm_retry(&mut self, handle: JoinHandle<()>) {
        replace(&mut self.retry, handle);
    }

    pub(crate) fn arm_timeout(&mut self, handle: JoinHandle<()>) {
        replace(&mut self.timeout, handle);
    }

    pub(crate) fn clear_retry(&mut self) -> bool {
        clear(&mut self.retry)
    }

    pub(crate) fn clear_timeout(&mut self) -> bool {
        clear(&mut self.timeout)
    }

    pub(crate) fn clear_all(&mut self) {
        self.clear_retry();
        self.clear_timeout();
    }

    pub(crate) fn has_retry(&self) -> bool {
        self.retry.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    pub(crate) fn has_timeout(&self) -> bool {
        self.timeout.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        self.clear_all();
    }
}

fn replace(slot: &mut Option<JoinHandle<()>>, handle: JoinHandle<()>) {
    clear(slot);
    *slot = Some(handle);
}

fn clear(slot: &mut Option<JoinHandle<()>>) -> bool {
    slot.take().is_some_and(|handle| {
        handle.abort();
        true
    })
}
