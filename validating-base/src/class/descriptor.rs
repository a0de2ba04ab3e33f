//! Runtime class descriptors.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::instance::Instance;
use crate::config::ValidationConfig;
use crate::context::{BoundCall, CallArgs, Signature};
use crate::contracts::Contract;
use crate::errors::CallError;
use crate::interceptors::{call_validated, InterceptorChain};

/// A method body: mutable access to the instance state plus the bound call.
pub type MethodBody<S> = Arc<dyn Fn(&mut S, &BoundCall) -> anyhow::Result<Value> + Send + Sync>;

/// A custom validator: shared access to the instance state plus the bound call.
pub type ValidatorHook<S> = Arc<dyn Fn(&S, &BoundCall) -> anyhow::Result<()> + Send + Sync>;

/// A callable member.
pub struct MethodEntry<S> {
    signature: Signature,
    body: MethodBody<S>,
    defined_in: String,
}

impl<S> MethodEntry<S> {
    pub(crate) fn new(signature: Signature, body: MethodBody<S>, defined_in: impl Into<String>) -> Self {
        Self {
            signature,
            body,
            defined_in: defined_in.into(),
        }
    }

    /// The declared signature.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The class that supplied this body.
    #[must_use]
    pub fn defined_in(&self) -> &str {
        &self.defined_in
    }

    /// Runs the body without any checks.
    pub fn invoke(&self, state: &mut S, call: &BoundCall) -> Result<Value, CallError> {
        (self.body)(state, call).map_err(CallError::Method)
    }
}

impl<S> Clone for MethodEntry<S> {
    fn clone(&self) -> Self {
        Self {
            signature: self.signature.clone(),
            body: Arc::clone(&self.body),
            defined_in: self.defined_in.clone(),
        }
    }
}

impl<S> fmt::Debug for MethodEntry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodEntry")
            .field("signature", &self.signature)
            .field("defined_in", &self.defined_in)
            .finish_non_exhaustive()
    }
}

/// A class member: a method or a plain attribute.
pub enum Member<S> {
    /// A callable method.
    Method(MethodEntry<S>),
    /// A non-callable value.
    Attribute(Value),
}

impl<S> Member<S> {
    /// Returns true for methods.
    #[must_use]
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Method(_))
    }
}

impl<S> Clone for Member<S> {
    fn clone(&self) -> Self {
        match self {
            Self::Method(entry) => Self::Method(entry.clone()),
            Self::Attribute(value) => Self::Attribute(value.clone()),
        }
    }
}

impl<S> fmt::Debug for Member<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method(entry) => f.debug_tuple("Method").field(entry).finish(),
            Self::Attribute(value) => f.debug_tuple("Attribute").field(value).finish(),
        }
    }
}

/// A built class: its contract, merged member table, and validation chains.
///
/// Immutable once built; share it through the `Arc` returned by
/// [`ClassBuilder::build`](super::ClassBuilder::build).
pub struct Class<S> {
    name: String,
    contract: Contract,
    members: HashMap<String, Member<S>>,
    chains: HashMap<String, InterceptorChain<S>>,
    validated: Vec<String>,
    config: ValidationConfig,
}

impl<S> Class<S> {
    pub(crate) fn new(
        name: String,
        contract: Contract,
        members: HashMap<String, Member<S>>,
        chains: HashMap<String, InterceptorChain<S>>,
        validated: Vec<String>,
        config: ValidationConfig,
    ) -> Self {
        Self {
            name,
            contract,
            members,
            chains,
            validated,
            config,
        }
    }

    /// The class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The merged contract, including inherited declarations.
    #[must_use]
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// The configuration the class was built with.
    #[must_use]
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Looks up a member by name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Member<S>> {
        self.members.get(name)
    }

    /// Looks up a plain attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        match self.members.get(name) {
            Some(Member::Attribute(value)) => Some(value),
            _ => None,
        }
    }

    /// Looks up a callable member.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::UnknownMethod`] if nothing has this name and
    /// [`CallError::NotCallable`] if it names an attribute.
    pub fn method(&self, name: &str) -> Result<&MethodEntry<S>, CallError> {
        match self.members.get(name) {
            Some(Member::Method(entry)) => Ok(entry),
            Some(Member::Attribute(_)) => Err(CallError::NotCallable {
                class_name: self.name.clone(),
                method: name.to_string(),
            }),
            None => Err(CallError::UnknownMethod {
                class_name: self.name.clone(),
                method: name.to_string(),
            }),
        }
    }

    /// The interceptor chain of a validated method.
    #[must_use]
    pub fn chain(&self, name: &str) -> Option<&InterceptorChain<S>> {
        self.chains.get(name)
    }

    /// Returns true if calls to `name` are intercepted.
    #[must_use]
    pub fn is_validated(&self, name: &str) -> bool {
        self.chains.contains_key(name)
    }

    /// Methods whose calls are intercepted, in declaration order.
    ///
    /// Validated names without an implementation are not listed.
    #[must_use]
    pub fn validated_methods(&self) -> &[String] {
        &self.validated
    }

    /// Names of every member, sorted.
    #[must_use]
    pub fn member_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.members.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Creates an instance owning `state`.
    #[must_use]
    pub fn instantiate(self: &Arc<Self>, state: S) -> Instance<S> {
        Instance::new(Arc::clone(self), state)
    }

    /// Calls a method on external state.
    pub fn invoke(&self, state: &mut S, name: &str, args: CallArgs) -> Result<Value, CallError> {
        call_validated(self, state, name, args)
    }
}

impl<S> fmt::Debug for Class<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("contract", &self.contract)
            .field("members", &self.member_names())
            .field("validated", &self.validated)
            .field("config", &self.config)
            .finish()
    }
}
