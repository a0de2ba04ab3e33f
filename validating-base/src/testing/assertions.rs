//! Test assertions for call and contract errors.

use serde_json::Value;

use super::logs::CapturedEvent;
use crate::errors::{CallError, ContractViolation, MismatchKind, ProblemKind};

/// Asserts that the call failed with a type mismatch of `kind`.
pub fn assert_type_mismatch(result: &Result<Value, CallError>, kind: MismatchKind) {
    match result {
        Err(err) => assert_eq!(
            err.mismatch_kind(),
            Some(kind),
            "Expected a {kind:?} type mismatch, got: {err}"
        ),
        Ok(value) => panic!("Expected a {kind:?} type mismatch, got Ok({value})"),
    }
}

/// Asserts that the call failed in its custom validator.
pub fn assert_validator_failed(result: &Result<Value, CallError>) {
    match result {
        Err(err) => assert!(
            err.validator_error().is_some(),
            "Expected a validator error, got: {err}"
        ),
        Ok(value) => panic!("Expected a validator error, got Ok({value})"),
    }
}

/// Asserts that the violation reports `method` with `kind`.
pub fn assert_violation(violation: &ContractViolation, method: &str, kind: ProblemKind) {
    assert!(
        violation.has_problem(method, kind),
        "Expected '{method}' to fail with {kind:?}, got problems: {:?}",
        violation.problems
    );
}

/// Asserts that the captured messages equal `expected`, in order.
pub fn assert_messages(events: &[CapturedEvent], expected: &[&str]) {
    let messages: Vec<&str> = events.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, expected, "Captured log lines differ");
}
