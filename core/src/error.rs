//! Controller error types.

use crate::state::LifecycleState;
use thiserror::Error;

/// Errors reported by controller operations.
///
/// None of these are raised for transport failures; those surface through
/// the controller's state and its `failed` event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// The operation is not valid in the current state. Nothing was changed.
    #[error("Cannot {operation} a request that is {state}")]
    InvalidState {
        /// The operation that was attempted
        operation: &'static str,
        /// State at the time of the call
        state: LifecycleState,
    },

    /// The ready handle belongs to an attempt cycle that has since been
    /// re-armed; it will never receive a result.
    #[error("Ready handle superseded by a newer attempt")]
    Superseded,

    /// The controller was created outside a Tokio runtime.
    #[error("No Tokio runtime available: {0}")]
    NoRuntime(String),
}
