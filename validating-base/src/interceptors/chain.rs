//! Interceptor chain for ordered call checks.

use serde_json::Value;
use std::sync::Arc;

use crate::context::BoundCall;
use crate::errors::CallError;

/// Trait for validated-call interceptors.
///
/// `S` is the instance state type of the class the interceptor is attached to.
pub trait CallInterceptor<S>: Send + Sync {
    /// Name used in log lines and rejection errors.
    fn name(&self) -> &str;

    /// Returns the interceptor's priority (lower = earlier `before`, later `after`).
    fn priority(&self) -> i32 {
        0
    }

    /// Called before the method body runs.
    ///
    /// Returning an error stops the call; the body never runs.
    fn before(&self, _receiver: &S, _call: &BoundCall) -> Result<(), CallError> {
        Ok(())
    }

    /// Called after the method body returned successfully.
    fn after(&self, _call: &BoundCall, _output: &Value) -> Result<(), CallError> {
        Ok(())
    }
}

/// A chain of interceptors for one validated method.
pub struct InterceptorChain<S> {
    interceptors: Vec<Arc<dyn CallInterceptor<S>>>,
}

impl<S> InterceptorChain<S> {
    /// Creates a new empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self {
            interceptors: Vec::new(),
        }
    }

    /// Adds an interceptor to the chain.
    ///
    /// Interceptors with equal priority keep insertion order.
    pub fn add(&mut self, interceptor: Arc<dyn CallInterceptor<S>>) {
        self.interceptors.push(interceptor);
        self.interceptors.sort_by_key(|i| i.priority());
    }

    /// Runs every `before` hook in priority order, stopping at the first error.
    pub fn run_before(&self, receiver: &S, call: &BoundCall) -> Result<(), CallError> {
        for interceptor in &self.interceptors {
            interceptor.before(receiver, call)?;
        }
        Ok(())
    }

    /// Runs every `after` hook in reverse priority order, stopping at the first error.
    pub fn run_after(&self, call: &BoundCall, output: &Value) -> Result<(), CallError> {
        for interceptor in self.interceptors.iter().rev() {
            interceptor.after(call, output)?;
        }
        Ok(())
    }

    /// Names of the interceptors, in `before` order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }

    /// Returns the number of interceptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Returns true if the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }
}

impl<S> Default for InterceptorChain<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for InterceptorChain<S> {
    fn clone(&self) -> Self {
        Self {
            interceptors: self.interceptors.clone(),
        }
    }
}

impl<S> std::fmt::Debug for InterceptorChain<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("interceptors", &self.names())
            .finish()
    }
}
