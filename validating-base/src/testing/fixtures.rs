//! Example classes for tests and benches.

use serde_json::{json, Value};
use thiserror::Error;

use crate::class::ClassBuilder;
use crate::context::{BoundCall, Parameter, Signature};
use crate::contracts::Contract;
use crate::types::TypeHint;

/// Instance state that counts how many times a method body ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counter {
    /// Number of completed body executions.
    pub calls: u32,
}

impl Counter {
    /// Creates a counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Error returned by the `validate_action` hook of [`action_base`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0} is not an integer")]
pub struct NotAnInteger(pub Value);

/// Checks that every element of `number_list` is an integer.
pub fn validate_action(_state: &Counter, call: &BoundCall) -> anyhow::Result<()> {
    let numbers = call
        .get("number_list")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for number in numbers {
        if !number.is_i64() && !number.is_u64() {
            return Err(NotAnInteger(number.clone()).into());
        }
    }
    Ok(())
}

/// The abstract `ActionExample` base: `action` is required and validated,
/// and the base supplies `validate_action`. Never built directly.
#[must_use]
pub fn action_base() -> ClassBuilder<Counter> {
    ClassBuilder::new("ActionExample")
        .contract(Contract::new().require("action").validate("action"))
        .validator("action", validate_action)
}

/// Signature of `action(number_list: <list_hint>) -> int`.
#[must_use]
pub fn action_signature(list_hint: TypeHint) -> Signature {
    Signature::new()
        .param(Parameter::new("number_list", list_hint))
        .returns(TypeHint::Int)
}

fn numbers(call: &BoundCall) -> anyhow::Result<Vec<i64>> {
    call.value::<Vec<i64>>("number_list").map_err(anyhow::Error::from)
}

/// `AdderExample`: sums `number_list: list[int]`.
#[must_use]
pub fn adder_builder() -> ClassBuilder<Counter> {
    action_base().extend("AdderExample").method(
        "action",
        action_signature(TypeHint::list(TypeHint::Int)),
        |state: &mut Counter, call: &BoundCall| {
            let total: i64 = numbers(call)?.iter().sum();
            state.calls += 1;
            Ok(json!(total))
        },
    )
}

/// `MultiplierExample`: multiplies `number_list: list[int]`.
#[must_use]
pub fn multiplier_builder() -> ClassBuilder<Counter> {
    action_base().extend("MultiplierExample").method(
        "action",
        action_signature(TypeHint::list(TypeHint::Int)),
        |state: &mut Counter, call: &BoundCall| {
            let total: i64 = numbers(call)?.iter().product();
            state.calls += 1;
            Ok(json!(total))
        },
    )
}

/// `InvalidExample`: inherits the contract but never defines `action`.
#[must_use]
pub fn invalid_builder() -> ClassBuilder<Counter> {
    action_base().extend("InvalidExample")
}
