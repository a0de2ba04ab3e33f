//! Class builder with contract enforcement.

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use super::descriptor::{Class, Member, MethodEntry, ValidatorHook};
use crate::config::ValidationConfig;
use crate::context::{BoundCall, Signature};
use crate::contracts::{Contract, ValidatedEntry};
use crate::errors::{ContractViolation, MethodProblem, ProblemKind};
use crate::interceptors::{CallInterceptor, InterceptorChain, PrerunInterceptor, TypeCheckInterceptor};
use crate::types::{StructuralChecker, TypeChecker};

struct RegisteredValidator<S> {
    hook: ValidatorHook<S>,
    owner: String,
}

impl<S> RegisteredValidator<S> {
    fn label(&self, method: &str) -> String {
        format!("{}.validate_{}", self.owner, method)
    }
}

impl<S> Clone for RegisteredValidator<S> {
    fn clone(&self) -> Self {
        Self {
            hook: Arc::clone(&self.hook),
            owner: self.owner.clone(),
        }
    }
}

/// Builder for classes with a contract.
///
/// A builder that never calls [`build`](Self::build) acts as an abstract base:
/// [`extend`](Self::extend) derives subclasses from it.
///
/// ```rust
/// use serde_json::json;
/// use validating_base::prelude::*;
///
/// let base: ClassBuilder<()> = ClassBuilder::new("Base")
///     .contract(Contract::new().require("action"));
///
/// assert!(base.extend("Empty").build().is_err());
///
/// let class = base
///     .extend("Echo")
///     .method("action", Signature::new(), |_, _| Ok(json!("done")))
///     .build()
///     .unwrap();
/// assert_eq!(class.invoke(&mut (), "action", CallArgs::new()).unwrap(), json!("done"));
/// ```
pub struct ClassBuilder<S> {
    name: String,
    contract: Contract,
    members: HashMap<String, Member<S>>,
    validators: BTreeMap<String, RegisteredValidator<S>>,
    interceptors: Vec<Arc<dyn CallInterceptor<S>>>,
    config: ValidationConfig,
    checker: Arc<dyn TypeChecker>,
}

impl<S: 'static> ClassBuilder<S> {
    /// Creates a builder with an empty contract.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contract: Contract::new(),
            members: HashMap::new(),
            validators: BTreeMap::new(),
            interceptors: Vec::new(),
            config: ValidationConfig::default(),
            checker: Arc::new(StructuralChecker),
        }
    }

    /// The name of the class being built.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds contract declarations after any already present.
    #[must_use]
    pub fn contract(mut self, contract: Contract) -> Self {
        self.contract.merge(&contract);
        self
    }

    /// Defines or overrides a method.
    #[must_use]
    pub fn method<F>(mut self, name: impl Into<String>, signature: Signature, body: F) -> Self
    where
        F: Fn(&mut S, &BoundCall) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        let entry = MethodEntry::new(signature, Arc::new(body), self.name.clone());
        self.members.insert(name.into(), Member::Method(entry));
        self
    }

    /// Defines or overrides a plain attribute.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        self.members.insert(name.into(), Member::Attribute(value));
        self
    }

    /// Registers the custom validator for `method`.
    ///
    /// The hook runs before the body of a prerun-validated method and sees
    /// the same bound arguments. Its error is returned to the caller as is.
    #[must_use]
    pub fn validator<F>(mut self, method: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&S, &BoundCall) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let registered = RegisteredValidator {
            hook: Arc::new(hook),
            owner: self.name.clone(),
        };
        self.validators.insert(method.into(), registered);
        self
    }

    /// Adds an interceptor to every validated method's chain.
    #[must_use]
    pub fn interceptor(mut self, interceptor: Arc<dyn CallInterceptor<S>>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the type checker.
    #[must_use]
    pub fn type_checker(mut self, checker: Arc<dyn TypeChecker>) -> Self {
        self.checker = checker;
        self
    }

    /// Starts a subclass that inherits everything declared so far.
    #[must_use]
    pub fn extend(&self, child_name: impl Into<String>) -> Self {
        Self {
            name: child_name.into(),
            ..self.clone()
        }
    }

    /// Checks that every required method is present and callable.
    ///
    /// # Errors
    ///
    /// Returns a [`ContractViolation`] naming every offending method.
    pub fn enforce_required(&self) -> Result<(), ContractViolation> {
        let problems = self.required_problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ContractViolation::new(&self.name, problems))
        }
    }

    fn required_problems(&self) -> Vec<MethodProblem> {
        self.contract
            .required_methods()
            .iter()
            .filter_map(|name| match self.members.get(name) {
                Some(Member::Method(_)) => None,
                Some(Member::Attribute(_)) => Some(MethodProblem::new(name, ProblemKind::NotCallable)),
                None => Some(MethodProblem::new(name, ProblemKind::Missing)),
            })
            .collect()
    }

    /// Resolves the validated declarations against the member table.
    ///
    /// Unimplemented names are dropped with a warning unless the config is strict.
    fn resolve_validated(&self, problems: &mut Vec<MethodProblem>) -> Vec<ValidatedEntry> {
        let mut effective = Vec::new();

        for entry in self.contract.validated_methods() {
            let already_reported = problems.iter().any(|p| p.method == entry.name);

            match self.members.get(&entry.name) {
                Some(Member::Method(_)) => {
                    if entry.mode.runs_prerun()
                        && self.config.require_validators
                        && !self.validators.contains_key(&entry.name)
                    {
                        problems.push(MethodProblem::new(&entry.name, ProblemKind::MissingValidator));
                    }
                    effective.push(entry.clone());
                }
                Some(Member::Attribute(_)) if !already_reported => {
                    problems.push(MethodProblem::new(&entry.name, ProblemKind::NotCallable));
                }
                None if self.config.strict && !already_reported => {
                    problems.push(MethodProblem::new(
                        &entry.name,
                        ProblemKind::UnimplementedValidated,
                    ));
                }
                None => {
                    warn!(
                        "'{}.{}' is declared as validated but not implemented; it will not be validated",
                        self.name, entry.name
                    );
                }
                Some(Member::Attribute(_)) => {}
            }
        }

        effective
    }

    fn warn_orphan_validators(&self, effective: &[ValidatedEntry]) {
        for (method, validator) in &self.validators {
            let used = effective
                .iter()
                .any(|e| &e.name == method && e.mode.runs_prerun());
            if !used {
                warn!(
                    "Validator '{}' is never run: '{}.{}' is not a prerun-validated method",
                    validator.label(method),
                    self.name,
                    method
                );
            }
        }
    }

    fn chain_for(&self, entry: &ValidatedEntry) -> InterceptorChain<S> {
        let mut chain = InterceptorChain::new();

        if entry.mode.checks_types() {
            chain.add(Arc::new(TypeCheckInterceptor::new(
                Arc::clone(&self.checker),
                self.config.check_arguments,
                self.config.check_returns,
            )));
        }

        if entry.mode.runs_prerun() && self.config.run_validators {
            if let Some(validator) = self.validators.get(&entry.name) {
                chain.add(Arc::new(PrerunInterceptor::new(
                    Arc::clone(&validator.hook),
                    validator.label(&entry.name),
                )));
            }
        }

        for interceptor in &self.interceptors {
            chain.add(Arc::clone(interceptor));
        }

        chain
    }

    /// Enforces the contract and builds the class.
    ///
    /// # Errors
    ///
    /// Returns a [`ContractViolation`] if a required method is missing or not
    /// callable, if a validated name is an attribute, or if the config's
    /// `strict` / `require_validators` checks fail.
    pub fn build(self) -> Result<Arc<Class<S>>, ContractViolation> {
        let mut problems = self.required_problems();
        let effective = self.resolve_validated(&mut problems);

        if !problems.is_empty() {
            return Err(ContractViolation::new(self.name, problems));
        }

        self.warn_orphan_validators(&effective);

        let chains = effective
            .iter()
            .map(|entry| (entry.name.clone(), self.chain_for(entry)))
            .collect();
        let validated = effective.into_iter().map(|entry| entry.name).collect();

        debug!("Methods of '{}' are ok", self.name);

        Ok(Arc::new(Class::new(
            self.name,
            self.contract,
            self.members,
            chains,
            validated,
            self.config,
        )))
    }
}

impl<S> Clone for ClassBuilder<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            contract: self.contract.clone(),
            members: self.members.clone(),
            validators: self.validators.clone(),
            interceptors: self.interceptors.clone(),
            config: self.config.clone(),
            checker: Arc::clone(&self.checker),
        }
    }
}

impl<S> fmt::Debug for ClassBuilder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut members: Vec<&str> = self.members.keys().map(String::as_str).collect();
        members.sort_unstable();
        f.debug_struct("ClassBuilder")
            .field("name", &self.name)
            .field("contract", &self.contract)
            .field("members", &members)
            .field("validators", &self.validators.keys().collect::<Vec<_>>())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
