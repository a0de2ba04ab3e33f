//! Built-in interceptors for validated methods and the call entry point.

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::chain::CallInterceptor;
use crate::class::{Class, ValidatorHook};
use crate::context::{BoundCall, CallArgs};
use crate::errors::{CallError, TypeMismatch};
use crate::types::TypeChecker;

/// Priority of the type-check interceptor.
pub const TYPE_CHECK_PRIORITY: i32 = 0;
/// Priority of the custom validator interceptor.
pub const PRERUN_PRIORITY: i32 = 10;

/// Checks supplied arguments before the body and the return value after it.
pub struct TypeCheckInterceptor {
    checker: Arc<dyn TypeChecker>,
    check_arguments: bool,
    check_returns: bool,
}

impl TypeCheckInterceptor {
    /// Creates a type-check interceptor.
    #[must_use]
    pub fn new(checker: Arc<dyn TypeChecker>, check_arguments: bool, check_returns: bool) -> Self {
        Self {
            checker,
            check_arguments,
            check_returns,
        }
    }
}

impl<S> CallInterceptor<S> for TypeCheckInterceptor {
    fn name(&self) -> &str {
        "type_check"
    }

    fn priority(&self) -> i32 {
        TYPE_CHECK_PRIORITY
    }

    fn before(&self, _receiver: &S, call: &BoundCall) -> Result<(), CallError> {
        if !self.check_arguments {
            return Ok(());
        }
        for argument in call.supplied() {
            self.checker
                .check(&argument.value, &argument.hint)
                .map_err(|failure| {
                    TypeMismatch::argument(call.class_name(), call.method(), &argument.name, failure)
                })?;
        }
        debug!("Argument types for '{}' are ok", call.qualified_name());
        Ok(())
    }

    fn after(&self, call: &BoundCall, output: &Value) -> Result<(), CallError> {
        if !self.check_returns {
            return Ok(());
        }
        if let Some(hint) = call.return_hint() {
            self.checker
                .check(output, hint)
                .map_err(|failure| TypeMismatch::returned(call.class_name(), call.method(), failure))?;
            debug!("Return type of '{}' is ok", call.qualified_name());
        }
        Ok(())
    }
}

/// Runs a class's custom validator before the body.
pub struct PrerunInterceptor<S> {
    hook: ValidatorHook<S>,
    label: String,
}

impl<S> PrerunInterceptor<S> {
    /// Creates a prerun interceptor; `label` names the validator in log lines.
    #[must_use]
    pub fn new(hook: ValidatorHook<S>, label: impl Into<String>) -> Self {
        Self {
            hook,
            label: label.into(),
        }
    }
}

impl<S> CallInterceptor<S> for PrerunInterceptor<S> {
    fn name(&self) -> &str {
        &self.label
    }

    fn priority(&self) -> i32 {
        PRERUN_PRIORITY
    }

    fn before(&self, receiver: &S, call: &BoundCall) -> Result<(), CallError> {
        (self.hook)(receiver, call).map_err(CallError::Validator)?;
        debug!(
            "Inputs for '{}' are ok (validated using '{}')",
            call.qualified_name(),
            self.label
        );
        Ok(())
    }
}

/// Calls `method_name` on `state` through the class's validation chain.
///
/// Order is fixed: bind arguments, type-check arguments, run the custom
/// validator, run the body, type-check the return value. Methods the class
/// does not validate run straight after binding.
pub fn call_validated<S>(
    class: &Class<S>,
    state: &mut S,
    method_name: &str,
    args: CallArgs,
) -> Result<Value, CallError> {
    let entry = class.method(method_name)?;
    let call = BoundCall::bind(class.name(), method_name, entry.signature(), args)?;

    let Some(chain) = class.chain(method_name) else {
        return entry.invoke(state, &call);
    };

    chain.run_before(state, &call)?;
    let output = entry.invoke(state, &call)?;
    chain.run_after(&call, &output)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Parameter, Signature};
    use crate::types::{MockTypeChecker, StructuralChecker, TypeCheckFailure, TypeHint};
    use serde_json::json;

    fn bound(args: CallArgs) -> BoundCall {
        let signature = Signature::new()
            .param(Parameter::new("n", TypeHint::Int))
            .param(Parameter::new("label", TypeHint::Str).with_default(json!(0)))
            .returns(TypeHint::Int);
        BoundCall::bind("C", "m", &signature, args).unwrap()
    }

    #[test]
    fn test_type_check_arguments() {
        let interceptor = TypeCheckInterceptor::new(Arc::new(StructuralChecker), true, true);

        let ok = bound(CallArgs::new().arg(json!(1)));
        assert!(CallInterceptor::<()>::before(&interceptor, &(), &ok).is_ok());

        let bad = bound(CallArgs::new().arg(json!("1")));
        let err = CallInterceptor::<()>::before(&interceptor, &(), &bad).unwrap_err();
        match err {
            CallError::TypeMismatch(m) => {
                assert_eq!(m.parameter.as_deref(), Some("n"));
                assert_eq!(m.expected, "int");
                assert_eq!(m.actual, "str");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_defaults_are_not_checked() {
        let interceptor = TypeCheckInterceptor::new(Arc::new(StructuralChecker), true, true);
        // the default for `label` is an int, but only supplied values are checked
        let call = bound(CallArgs::new().arg(json!(1)));
        assert!(CallInterceptor::<()>::before(&interceptor, &(), &call).is_ok());
    }

    #[test]
    fn test_type_check_return() {
        let interceptor = TypeCheckInterceptor::new(Arc::new(StructuralChecker), true, true);
        let call = bound(CallArgs::new().arg(json!(1)));

        assert!(CallInterceptor::<()>::after(&interceptor, &call, &json!(3)).is_ok());
        let err = CallInterceptor::<()>::after(&interceptor, &call, &json!("3")).unwrap_err();
        assert_eq!(err.mismatch_kind(), Some(crate::errors::MismatchKind::Return));
    }

    #[test]
    fn test_disabled_checks_skip_checker() {
        let mut checker = MockTypeChecker::new();
        checker.expect_check().never();

        let interceptor = TypeCheckInterceptor::new(Arc::new(checker), false, false);
        let call = bound(CallArgs::new().arg(json!("wrong")));

        assert!(CallInterceptor::<()>::before(&interceptor, &(), &call).is_ok());
        assert!(CallInterceptor::<()>::after(&interceptor, &call, &json!("wrong")).is_ok());
    }

    #[test]
    fn test_checker_is_substitutable() {
        let mut checker = MockTypeChecker::new();
        checker
            .expect_check()
            .times(1)
            .returning(|_, _| Err(TypeCheckFailure::new("Even", "odd int")));

        let interceptor = TypeCheckInterceptor::new(Arc::new(checker), true, true);
        let call = bound(CallArgs::new().arg(json!(3)));

        let err = CallInterceptor::<()>::before(&interceptor, &(), &call).unwrap_err();
        assert!(err.to_string().contains("expected Even, got odd int"));
    }

    #[test]
    fn test_prerun_propagates_hook_error() {
        let hook: ValidatorHook<()> = Arc::new(|_: &(), call: &BoundCall| {
            let n: i64 = call.value("n")?;
            anyhow::ensure!(n > 0, "n must be positive");
            Ok(())
        });
        let interceptor = PrerunInterceptor::new(hook, "C.validate_m");

        assert!(interceptor.before(&(), &bound(CallArgs::new().arg(json!(1)))).is_ok());

        let err = interceptor
            .before(&(), &bound(CallArgs::new().arg(json!(-1))))
            .unwrap_err();
        assert_eq!(err.to_string(), "n must be positive");
        assert!(err.validator_error().is_some());
    }
}
