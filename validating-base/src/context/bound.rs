//! The per-call record handed to interceptors, validators, and method bodies.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::arguments::CallArgs;
use super::signature::{BoundArgument, Signature};
use crate::errors::{ArgumentError, BindingError};
use crate::types::TypeHint;

/// Resolved arguments and declared hints for one method call.
///
/// Created at call entry and dropped when the call returns.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundCall {
    class_name: String,
    method: String,
    arguments: Vec<BoundArgument>,
    return_hint: Option<TypeHint>,
}

impl BoundCall {
    /// Binds `args` against `signature`.
    pub fn bind(
        class_name: impl Into<String>,
        method: impl Into<String>,
        signature: &Signature,
        args: CallArgs,
    ) -> Result<Self, BindingError> {
        let method = method.into();
        let arguments = signature.bind(&method, args)?;
        Ok(Self {
            class_name: class_name.into(),
            method,
            arguments,
            return_hint: signature.return_hint().cloned(),
        })
    }

    /// The class the method was called on.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// `Class.method`, as used in log lines.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.class_name, self.method)
    }

    /// All bound arguments in declaration order.
    #[must_use]
    pub fn arguments(&self) -> &[BoundArgument] {
        &self.arguments
    }

    /// Arguments the caller actually supplied.
    pub fn supplied(&self) -> impl Iterator<Item = &BoundArgument> {
        self.arguments.iter().filter(|a| a.supplied)
    }

    /// The declared return type, if any.
    #[must_use]
    pub fn return_hint(&self) -> Option<&TypeHint> {
        self.return_hint.as_ref()
    }

    /// Looks up an argument value by parameter name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
    }

    /// Reads an argument as a concrete Rust type.
    pub fn value<T: DeserializeOwned>(&self, name: &str) -> Result<T, ArgumentError> {
        let value = self
            .get(name)
            .ok_or_else(|| ArgumentError::new(&self.method, name, "no such parameter"))?;

        serde_json::from_value(value.clone())
            .map_err(|e| ArgumentError::new(&self.method, name, format!("invalid type: {e}")))
    }
}
