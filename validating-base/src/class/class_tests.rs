//! Tests for class building and member resolution.

#[cfg(test)]
mod tests {
    use crate::class::{ClassBuilder, Member};
    use crate::config::ValidationConfig;
    use crate::context::{BoundCall, CallArgs, Signature};
    use crate::contracts::{Contract, ValidationMode};
    use crate::errors::{codes, CallError, ProblemKind};
    use crate::testing::{
        action_base, adder_builder, assert_violation, capture_events, invalid_builder,
        RecordingInterceptor,
    };
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tracing::Level;

    fn noop() -> impl Fn(&mut (), &BoundCall) -> anyhow::Result<Value> + Send + Sync + 'static {
        |_, _| Ok(Value::Null)
    }

    #[test]
    fn test_missing_required_method() {
        let err = invalid_builder().build().unwrap_err();

        assert_eq!(err.class_name, "InvalidExample");
        assert_eq!(err.methods(), vec!["action"]);
        assert_violation(&err, "action", ProblemKind::Missing);
        assert_eq!(err.error_info.code, codes::MISSING_METHOD);
        assert!(err.error_info.fix_hint.is_some());
        assert!(err.to_string().contains("'action' must be defined"));
    }

    #[test]
    fn test_enforce_required_collects_every_problem() {
        let builder = ClassBuilder::<()>::new("Widget")
            .contract(Contract::new().require("a").require("b").require("c"))
            .method("b", Signature::new(), noop())
            .attribute("c", json!(3));

        let err = builder.enforce_required().unwrap_err();
        assert_eq!(err.methods(), vec!["a", "c"]);
        assert_violation(&err, "a", ProblemKind::Missing);
        assert_violation(&err, "c", ProblemKind::NotCallable);
    }

    #[test]
    fn test_trivial_body_satisfies_requirement() {
        let class = ClassBuilder::<()>::new("Widget")
            .contract(Contract::new().require("a"))
            .method("a", Signature::new(), noop())
            .build()
            .unwrap();

        assert_eq!(class.name(), "Widget");
        assert!(class.contract().is_required("a"));
    }

    #[test]
    fn test_inherited_body_satisfies_requirement() {
        let base = ClassBuilder::<()>::new("Base")
            .contract(Contract::new().require("a"))
            .method("a", Signature::new(), noop());

        let class = base.extend("Child").build().unwrap();
        let entry = class.method("a").unwrap();
        assert_eq!(entry.defined_in(), "Base");
    }

    #[test]
    fn test_child_contract_extends_parent() {
        let base = ClassBuilder::<()>::new("Base").contract(Contract::new().require("a"));
        let err = base
            .extend("Child")
            .contract(Contract::new().require("b"))
            .method("a", Signature::new(), noop())
            .build()
            .unwrap_err();

        assert_eq!(err.methods(), vec!["b"]);

        // the base builder is untouched
        assert_eq!(base.name(), "Base");
        assert_eq!(base.enforce_required().unwrap_err().methods(), vec!["a"]);
    }

    #[test]
    fn test_unimplemented_validated_method_is_dropped() {
        let (class, events) = capture_events(|| {
            ClassBuilder::<()>::new("Widget")
                .contract(Contract::new().validate("missing"))
                .build()
                .unwrap()
        });

        assert!(class.validated_methods().is_empty());
        assert!(!class.is_validated("missing"));

        let warnings: Vec<_> = events.iter().filter(|e| e.level == Level::WARN).collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("'Widget.missing'"));
    }

    #[test]
    fn test_unimplemented_validated_method_is_error_when_strict() {
        let err = ClassBuilder::<()>::new("Widget")
            .contract(Contract::new().validate("missing"))
            .config(ValidationConfig::new().strict())
            .build()
            .unwrap_err();

        assert_violation(&err, "missing", ProblemKind::UnimplementedValidated);
        assert_eq!(err.error_info.code, codes::UNIMPLEMENTED_VALIDATED);
    }

    #[test]
    fn test_validated_attribute_is_not_callable() {
        let err = ClassBuilder::<()>::new("Widget")
            .contract(Contract::new().validate("limit"))
            .attribute("limit", json!(10))
            .build()
            .unwrap_err();

        assert_violation(&err, "limit", ProblemKind::NotCallable);
    }

    #[test]
    fn test_required_and_validated_attribute_reported_once() {
        let err = ClassBuilder::<()>::new("Widget")
            .contract(Contract::new().require("limit").validate("limit"))
            .attribute("limit", json!(10))
            .build()
            .unwrap_err();

        assert_eq!(err.problems.len(), 1);
    }

    #[test]
    fn test_require_validators() {
        let builder = ClassBuilder::<()>::new("Widget")
            .contract(Contract::new().validate("a").validate_types("b"))
            .method("a", Signature::new(), noop())
            .method("b", Signature::new(), noop())
            .config(ValidationConfig::new().require_validators());

        let err = builder.clone().build().unwrap_err();
        assert_eq!(err.methods(), vec!["a"]);
        assert_violation(&err, "a", ProblemKind::MissingValidator);

        assert!(builder.validator("a", |_, _| Ok(())).build().is_ok());
    }

    #[test]
    fn test_orphan_validator_warns() {
        let (_, events) = capture_events(|| {
            ClassBuilder::<()>::new("Widget")
                .contract(Contract::new().validate_types("a"))
                .method("a", Signature::new(), noop())
                .validator("a", |_, _| Ok(()))
                .build()
                .unwrap()
        });

        let warnings: Vec<_> = events
            .iter()
            .filter(|e| e.level == Level::WARN)
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("'Widget.validate_a'"));
    }

    #[test]
    fn test_chain_layout_follows_mode() {
        let recorder = RecordingInterceptor::new("audit");
        let class = ClassBuilder::<()>::new("Widget")
            .contract(
                Contract::new()
                    .validate("full")
                    .with_mode("types", ValidationMode::Types)
                    .with_mode("prerun", ValidationMode::Prerun),
            )
            .method("full", Signature::new(), noop())
            .method("types", Signature::new(), noop())
            .method("prerun", Signature::new(), noop())
            .method("plain", Signature::new(), noop())
            .validator("full", |_, _| Ok(()))
            .validator("prerun", |_, _| Ok(()))
            .interceptor(Arc::new(recorder))
            .build()
            .unwrap();

        assert_eq!(
            class.chain("full").unwrap().names(),
            vec!["type_check", "Widget.validate_full", "audit"]
        );
        assert_eq!(class.chain("types").unwrap().names(), vec!["type_check", "audit"]);
        assert_eq!(
            class.chain("prerun").unwrap().names(),
            vec!["Widget.validate_prerun", "audit"]
        );
        assert!(class.chain("plain").is_none());
        assert_eq!(class.validated_methods(), ["full", "types", "prerun"]);
    }

    #[test]
    fn test_disabled_validators_leave_no_prerun_step() {
        let class = action_base()
            .extend("Quiet")
            .method("action", Signature::new(), |_, _| Ok(json!(0)))
            .config(ValidationConfig::new().with_validators(false))
            .build()
            .unwrap();

        assert_eq!(class.chain("action").unwrap().names(), vec!["type_check"]);
    }

    #[test]
    fn test_member_lookup() {
        let class = ClassBuilder::<()>::new("Widget")
            .method("run", Signature::new(), noop())
            .attribute("limit", json!(10))
            .build()
            .unwrap();

        assert!(matches!(class.member("run"), Some(Member::Method(_))));
        assert!(class.member("run").is_some_and(Member::is_callable));
        assert!(!class.member("limit").is_some_and(Member::is_callable));
        assert_eq!(class.attribute("limit"), Some(&json!(10)));
        assert_eq!(class.member_names(), vec!["limit", "run"]);

        let err = class.invoke(&mut (), "limit", CallArgs::new()).unwrap_err();
        assert!(matches!(err, CallError::NotCallable { .. }));

        let err = class.invoke(&mut (), "nope", CallArgs::new()).unwrap_err();
        assert!(matches!(err, CallError::UnknownMethod { .. }));
        assert_eq!(err.to_string(), "'Widget' has no method 'nope'");
    }

    #[test]
    fn test_override_replaces_parent_body() {
        let class = adder_builder()
            .extend("Doubler")
            .method("action", Signature::new(), |state, _| {
                state.calls += 2;
                Ok(json!(-1))
            })
            .build()
            .unwrap();

        let mut instance = class.instantiate(crate::testing::Counter::new());
        // the override has no return hint, so -1 passes
        assert_eq!(instance.call("action", CallArgs::new()).unwrap(), json!(-1));
        assert_eq!(instance.state().calls, 2);
        assert_eq!(class.method("action").unwrap().defined_in(), "Doubler");
    }

    #[test]
    fn test_build_logs_methods_ok() {
        let (_, events) = capture_events(|| adder_builder().build().unwrap());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::DEBUG);
        assert_eq!(events[0].message, "Methods of 'AdderExample' are ok");
    }

    #[test]
    fn test_failed_build_does_not_log_ok() {
        let (result, events) = capture_events(|| invalid_builder().build());
        assert!(result.is_err());
        assert!(events.is_empty());
    }
}
