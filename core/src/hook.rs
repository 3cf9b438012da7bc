//! Interception hooks.
//!
//! Hooks return a [`HookOutcome`] rather than an optional value, so a hook can
//! install a falsy-looking result (`false`, `0`, an empty string) without it
//! being mistaken for "no change".

use crate::descriptor::RequestDescriptor;
use crate::response::{RequestResult, Response};
use std::sync::Arc;

/// What a hook wants done with the value flowing through the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub enum HookOutcome<T> {
    /// Use this value from now on
    Replace(T),
    /// Leave the current value as it is
    Keep,
}

impl<T> HookOutcome<T> {
    /// Resolve against the current value.
    pub fn apply(self, current: T) -> T {
        match self {
            Self::Replace(value) => value,
            Self::Keep => current,
        }
    }
}

impl<T> From<Option<T>> for HookOutcome<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Keep, Self::Replace)
    }
}

/// Runs before a send; receives the current descriptor and may replace it.
pub type BeforeHook = Arc<dyn Fn(&RequestDescriptor) -> HookOutcome<RequestDescriptor> + Send + Sync>;

/// Runs after a successful settlement; receives a clone of the response and
/// may replace the controller's result.
pub type AfterHook = Arc<dyn Fn(Response) -> HookOutcome<RequestResult> + Send + Sync>;
