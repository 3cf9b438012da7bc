//! Lifecycle state and controller identity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Where a controller is in its send/settle cycle.
///
/// ```text
/// init --send()--> pending --(settle ok)--> fulfilled
/// pending --(settle fail / abort)--> rejected
/// rejected --retry()--> pending
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Constructed, never sent
    #[default]
    Init,
    /// Sent, awaiting settlement
    Pending,
    /// Transport resolved and after-hooks applied
    Fulfilled,
    /// Transport failed or was aborted
    Rejected,
}

impl LifecycleState {
    /// Lowercase name of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Pending => "pending",
            Self::Fulfilled => "fulfilled",
            Self::Rejected => "rejected",
        }
    }

    /// Whether the last attempt has settled, successfully or not.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Fulfilled | Self::Rejected)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-unique identity of a controller, carried as the `sender` of the
/// events it publishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(u64);

impl ControllerId {
    /// Allocate the next identifier.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request-{}", self.0)
    }
}
