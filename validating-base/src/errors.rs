//! Error types for validating-base.
//!
//! Construction-time failures surface as [`ContractViolation`]; call-time
//! failures surface as [`CallError`]. Custom validator and method body errors
//! are carried through unmodified so callers can downcast to their own types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::contracts::get_contract_suggestion;

/// The main error type for validating-base operations.
#[derive(Debug, Error)]
pub enum ValidatingError {
    /// A class failed its contract at construction time.
    #[error("{0}")]
    Contract(#[from] ContractViolation),

    /// A call to a class method failed.
    #[error("{0}")]
    Call(#[from] CallError),

    /// A type hint could not be parsed.
    #[error("{0}")]
    Hint(#[from] HintParseError),
}

/// Common contract error codes.
pub mod codes {
    /// A required method is not defined.
    pub const MISSING_METHOD: &str = "CONTRACT-001-MISSING_METHOD";
    /// A required or validated name resolves to a non-callable member.
    pub const NOT_CALLABLE: &str = "CONTRACT-002-NOT_CALLABLE";
    /// A validated method is not defined (strict mode only).
    pub const UNIMPLEMENTED_VALIDATED: &str = "CONTRACT-003-UNIMPLEMENTED_VALIDATED";
    /// A prerun-validated method has no validator (when validators are required).
    pub const MISSING_VALIDATOR: &str = "CONTRACT-004-MISSING_VALIDATOR";
}

/// Metadata about a contract error for better diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ContractErrorInfo {
    /// Error code (e.g., "CONTRACT-001-MISSING_METHOD").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
    /// Additional context key-value pairs.
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl ContractErrorInfo {
    /// Creates a new contract error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
            context: HashMap::new(),
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Adds a single context entry.
    #[must_use]
    pub fn with_context_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// Why a method name failed the class contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    /// The name does not resolve to any member.
    Missing,
    /// The name resolves to a plain attribute.
    NotCallable,
    /// A validated method is not implemented.
    UnimplementedValidated,
    /// A prerun-validated method has no validator registered.
    MissingValidator,
}

impl ProblemKind {
    /// Returns the stable contract code for this problem.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Missing => codes::MISSING_METHOD,
            Self::NotCallable => codes::NOT_CALLABLE,
            Self::UnimplementedValidated => codes::UNIMPLEMENTED_VALIDATED,
            Self::MissingValidator => codes::MISSING_VALIDATOR,
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Missing => "must be defined",
            Self::NotCallable => "must be callable",
            Self::UnimplementedValidated => "is validated but not implemented",
            Self::MissingValidator => "has no validator",
        };
        f.write_str(text)
    }
}

/// A single offending method name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodProblem {
    /// The method name.
    pub method: String,
    /// What is wrong with it.
    pub kind: ProblemKind,
}

impl MethodProblem {
    /// Creates a new method problem.
    #[must_use]
    pub fn new(method: impl Into<String>, kind: ProblemKind) -> Self {
        Self {
            method: method.into(),
            kind,
        }
    }
}

impl fmt::Display for MethodProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' {}", self.method, self.kind)
    }
}

/// Error raised when a class does not satisfy its contract.
#[derive(Debug, Clone, Error)]
#[error("Contract violation in class '{class_name}': {}", join_problems(.problems))]
pub struct ContractViolation {
    /// The offending class.
    pub class_name: String,
    /// Every problem found, in declaration order.
    pub problems: Vec<MethodProblem>,
    /// Diagnostic metadata, keyed on the first problem.
    pub error_info: ContractErrorInfo,
}

fn join_problems(problems: &[MethodProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ContractViolation {
    /// Creates a new contract violation.
    #[must_use]
    pub fn new(class_name: impl Into<String>, problems: Vec<MethodProblem>) -> Self {
        let class_name = class_name.into();
        let code = problems
            .first()
            .map_or(codes::MISSING_METHOD, |p| p.kind.code());

        let mut info = ContractErrorInfo::new(
            code,
            format!(
                "Class '{}' does not satisfy its contract: {}",
                class_name,
                join_problems(&problems)
            ),
        )
        .with_context_entry("class", class_name.clone())
        .with_context_entry(
            "methods",
            problems
                .iter()
                .map(|p| p.method.as_str())
                .collect::<Vec<_>>()
                .join(","),
        );

        if let Some(suggestion) = get_contract_suggestion(code) {
            info = info.with_fix_hint(suggestion.fix_steps.join("; "));
        }

        Self {
            class_name,
            problems,
            error_info: info,
        }
    }

    /// Names of every offending method.
    #[must_use]
    pub fn methods(&self) -> Vec<&str> {
        self.problems.iter().map(|p| p.method.as_str()).collect()
    }

    /// Returns true if `method` failed with `kind`.
    #[must_use]
    pub fn has_problem(&self, method: &str, kind: ProblemKind) -> bool {
        self.problems
            .iter()
            .any(|p| p.method == method && p.kind == kind)
    }
}

/// Which side of a call failed its type check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    /// A supplied argument.
    Argument,
    /// The value returned by the method body.
    Return,
}

/// Error raised when a value does not match its declared type hint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Type mismatch for {} of '{class_name}.{method}': expected {expected}, got {actual}{}", subject(.kind, .parameter.as_deref()), location(.path))]
pub struct TypeMismatch {
    /// Argument or return.
    pub kind: MismatchKind,
    /// The class the method belongs to.
    pub class_name: String,
    /// The method name.
    pub method: String,
    /// The parameter name, for argument mismatches.
    pub parameter: Option<String>,
    /// The expected type, rendered as a hint.
    pub expected: String,
    /// The actual runtime type.
    pub actual: String,
    /// Location inside the value where the check failed (empty at the root).
    pub path: String,
}

fn subject(kind: &MismatchKind, parameter: Option<&str>) -> String {
    match (kind, parameter) {
        (MismatchKind::Argument, Some(name)) => format!("argument '{name}'"),
        (MismatchKind::Argument, None) => "argument".to_string(),
        (MismatchKind::Return, _) => "return value".to_string(),
    }
}

fn location(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" (at {path})")
    }
}

impl TypeMismatch {
    /// Creates an argument mismatch.
    #[must_use]
    pub fn argument(
        class_name: impl Into<String>,
        method: impl Into<String>,
        parameter: impl Into<String>,
        failure: crate::types::TypeCheckFailure,
    ) -> Self {
        Self {
            kind: MismatchKind::Argument,
            class_name: class_name.into(),
            method: method.into(),
            parameter: Some(parameter.into()),
            expected: failure.expected,
            actual: failure.actual,
            path: failure.path,
        }
    }

    /// Creates a return value mismatch.
    #[must_use]
    pub fn returned(
        class_name: impl Into<String>,
        method: impl Into<String>,
        failure: crate::types::TypeCheckFailure,
    ) -> Self {
        Self {
            kind: MismatchKind::Return,
            class_name: class_name.into(),
            method: method.into(),
            parameter: None,
            expected: failure.expected,
            actual: failure.actual,
            path: failure.path,
        }
    }
}

/// Errors raised while matching call arguments to a signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// More positional arguments than positional parameters.
    #[error("'{method}' takes {expected} positional argument(s) but {got} were given")]
    TooManyPositional {
        /// The method name.
        method: String,
        /// Number of positional parameters.
        expected: usize,
        /// Number of positional arguments supplied.
        got: usize,
    },

    /// A keyword argument matches no parameter.
    #[error("'{method}' got an unexpected keyword argument '{name}'")]
    UnexpectedKeyword {
        /// The method name.
        method: String,
        /// The unknown keyword.
        name: String,
    },

    /// A parameter received a value twice.
    #[error("'{method}' got multiple values for argument '{name}'")]
    Duplicate {
        /// The method name.
        method: String,
        /// The parameter name.
        name: String,
    },

    /// Required parameters were not supplied.
    #[error("'{method}' missing required argument(s): {}", .names.join(", "))]
    Missing {
        /// The method name.
        method: String,
        /// The missing parameter names.
        names: Vec<String>,
    },
}

/// Error raised when reading a bound argument as a concrete Rust type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Argument '{name}' of '{method}': {reason}")]
pub struct ArgumentError {
    /// The method name.
    pub method: String,
    /// The argument name.
    pub name: String,
    /// Why the argument could not be read.
    pub reason: String,
}

impl ArgumentError {
    /// Creates a new argument error.
    #[must_use]
    pub fn new(method: impl Into<String>, name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Error raised when a type hint cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid type hint '{input}' at offset {offset}: {reason}")]
pub struct HintParseError {
    /// The hint text.
    pub input: String,
    /// Byte offset where parsing failed.
    pub offset: usize,
    /// What went wrong.
    pub reason: String,
}

impl HintParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(input: impl Into<String>, offset: usize, reason: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            offset,
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by a method call on a class instance.
#[derive(Debug, Error)]
pub enum CallError {
    /// An argument or the return value failed its type check.
    #[error("{0}")]
    TypeMismatch(#[from] TypeMismatch),

    /// The arguments could not be matched to the signature.
    #[error("{0}")]
    Binding(#[from] BindingError),

    /// The custom validator rejected the arguments.
    #[error(transparent)]
    Validator(anyhow::Error),

    /// The method body failed.
    #[error(transparent)]
    Method(anyhow::Error),

    /// Another interceptor in the chain rejected the call.
    #[error("Interceptor '{interceptor}' rejected the call: {reason}")]
    Rejected {
        /// The interceptor name.
        interceptor: String,
        /// The reason.
        reason: String,
    },

    /// The class has no member with this name.
    #[error("'{class_name}' has no method '{method}'")]
    UnknownMethod {
        /// The class name.
        class_name: String,
        /// The requested name.
        method: String,
    },

    /// The member exists but is a plain attribute.
    #[error("'{class_name}.{method}' is not callable")]
    NotCallable {
        /// The class name.
        class_name: String,
        /// The requested name.
        method: String,
    },
}

impl CallError {
    /// Returns the mismatch kind if this is a type mismatch.
    #[must_use]
    pub fn mismatch_kind(&self) -> Option<MismatchKind> {
        match self {
            Self::TypeMismatch(m) => Some(m.kind),
            _ => None,
        }
    }

    /// Returns the validator's own error, if the validator failed.
    #[must_use]
    pub fn validator_error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Validator(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the method body's own error, if the body failed.
    #[must_use]
    pub fn method_error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Method(e) => Some(e),
            _ => None,
        }
    }
}
