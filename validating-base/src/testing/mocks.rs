//! Mock interceptors for testing.

use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

use crate::context::BoundCall;
use crate::errors::CallError;
use crate::interceptors::CallInterceptor;

/// An interceptor that records every hook it sees.
///
/// Entries read `before:<Class.method>` and `after:<Class.method>`.
#[derive(Debug, Clone)]
pub struct RecordingInterceptor {
    name: String,
    priority: i32,
    log: Arc<Mutex<Vec<String>>>,
}

impl RecordingInterceptor {
    /// Creates a recording interceptor with priority 100.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: 100,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Returns the recorded entries.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.log.lock().clone()
    }

    /// Returns the number of `before` hooks seen.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.log.lock().iter().filter(|e| e.starts_with("before:")).count()
    }

    /// Clears the recorded entries.
    pub fn reset(&self) {
        self.log.lock().clear();
    }
}

impl<S> CallInterceptor<S> for RecordingInterceptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn before(&self, _receiver: &S, call: &BoundCall) -> Result<(), CallError> {
        self.log.lock().push(format!("before:{}", call.qualified_name()));
        Ok(())
    }

    fn after(&self, call: &BoundCall, _output: &Value) -> Result<(), CallError> {
        self.log.lock().push(format!("after:{}", call.qualified_name()));
        Ok(())
    }
}

/// An interceptor that rejects every call.
#[derive(Debug, Clone)]
pub struct RejectingInterceptor {
    name: String,
    reason: String,
    priority: i32,
}

impl RejectingInterceptor {
    /// Creates a rejecting interceptor with priority 100.
    #[must_use]
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
            priority: 100,
        }
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl<S> CallInterceptor<S> for RejectingInterceptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn before(&self, _receiver: &S, _call: &BoundCall) -> Result<(), CallError> {
        Err(CallError::Rejected {
            interceptor: self.name.clone(),
            reason: self.reason.clone(),
        })
    }
}
