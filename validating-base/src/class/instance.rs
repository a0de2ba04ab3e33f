//! Instances of built classes.

use serde_json::Value;
use std::sync::Arc;

use super::descriptor::Class;
use crate::context::CallArgs;
use crate::errors::CallError;

/// A class paired with owned instance state.
pub struct Instance<S> {
    class: Arc<Class<S>>,
    state: S,
}

impl<S> Instance<S> {
    pub(crate) fn new(class: Arc<Class<S>>, state: S) -> Self {
        Self { class, state }
    }

    /// The instance's class.
    #[must_use]
    pub fn class(&self) -> &Arc<Class<S>> {
        &self.class
    }

    /// Shared access to the state.
    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Mutable access to the state.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Consumes the instance and returns its state.
    #[must_use]
    pub fn into_state(self) -> S {
        self.state
    }

    /// Calls a method by name.
    ///
    /// Validated methods go through their interceptor chain; other methods
    /// run straight after their arguments are bound.
    ///
    /// # Errors
    ///
    /// Returns a [`CallError`] if the name is unknown or not callable, the
    /// arguments do not bind, a check fails, or the body fails.
    pub fn call(&mut self, name: &str, args: impl Into<CallArgs>) -> Result<Value, CallError> {
        self.class.invoke(&mut self.state, name, args.into())
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Instance<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class.name())
            .field("state", &self.state)
            .finish()
    }
}
