//! Runtime compatibility checks between values and type hints.

use serde_json::Value;
use std::fmt;

use super::hint::{literal_repr, TypeHint};

/// Why a value failed a type check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCheckFailure {
    /// The expected type at the failing location.
    pub expected: String,
    /// The actual runtime type at the failing location.
    pub actual: String,
    /// Where inside the checked value the failure happened, e.g. `[2]['id']`.
    pub path: String,
}

impl TypeCheckFailure {
    /// Creates a failure at the root of the value.
    #[must_use]
    pub fn new(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            actual: actual.into(),
            path: String::new(),
        }
    }

    /// Prefixes the path with an outer segment.
    #[must_use]
    pub fn within(mut self, segment: &str) -> Self {
        self.path.insert_str(0, segment);
        self
    }
}

impl fmt::Display for TypeCheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}, got {}", self.expected, self.actual)?;
        if !self.path.is_empty() {
            write!(f, " at {}", self.path)?;
        }
        Ok(())
    }
}

/// A type-checking engine.
///
/// The interceptor treats this as a black box: anything that can decide
/// whether a value is compatible with a hint can be plugged into a class.
#[cfg_attr(test, mockall::automock)]
pub trait TypeChecker: Send + Sync {
    /// Checks `value` against `hint`.
    fn check(&self, value: &Value, hint: &TypeHint) -> Result<(), TypeCheckFailure>;
}

/// Returns the runtime type name of a value.
#[must_use]
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "None",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// The default checker: walks the value and the hint together.
///
/// `bool` is not accepted where `int` is expected, and `int` is accepted
/// where `float` is expected.
///
/// Recursion follows the hint, not the value: a value nested deeper than its
/// hint is never walked past the hint's leaves. Parsed hints are at most
/// [`MAX_NESTING`](super::MAX_NESTING) levels deep.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralChecker;

impl StructuralChecker {
    /// Creates a new structural checker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn mismatch(hint: &TypeHint, value: &Value) -> TypeCheckFailure {
        TypeCheckFailure::new(hint.to_string(), type_name(value))
    }
}

impl TypeChecker for StructuralChecker {
    fn check(&self, value: &Value, hint: &TypeHint) -> Result<(), TypeCheckFailure> {
        match (hint, value) {
            (TypeHint::Any, _)
            | (TypeHint::None, Value::Null)
            | (TypeHint::Bool, Value::Bool(_))
            | (TypeHint::Float, Value::Number(_))
            | (TypeHint::Str, Value::String(_))
            | (TypeHint::Tuple(None), Value::Array(_))
            | (TypeHint::Optional(_), Value::Null) => Ok(()),
            (TypeHint::Int, Value::Number(n)) if !n.is_f64() => Ok(()),
            (TypeHint::List(item), Value::Array(items)) => {
                for (index, element) in items.iter().enumerate() {
                    self.check(element, item)
                        .map_err(|f| f.within(&format!("[{index}]")))?;
                }
                Ok(())
            }
            (TypeHint::Tuple(Some(expected)), Value::Array(items)) => {
                if expected.len() != items.len() {
                    return Err(TypeCheckFailure::new(
                        hint.to_string(),
                        format!("list of length {}", items.len()),
                    ));
                }
                for (index, (element, item)) in items.iter().zip(expected).enumerate() {
                    self.check(element, item)
                        .map_err(|f| f.within(&format!("[{index}]")))?;
                }
                Ok(())
            }
            (TypeHint::Dict(item), Value::Object(map)) => {
                for (key, element) in map {
                    self.check(element, item)
                        .map_err(|f| f.within(&format!("['{key}']")))?;
                }
                Ok(())
            }
            (TypeHint::Optional(inner), _) => self.check(value, inner),
            (TypeHint::Union(options), _) => {
                if options.iter().any(|option| self.check(value, option).is_ok()) {
                    Ok(())
                } else {
                    Err(Self::mismatch(hint, value))
                }
            }
            (TypeHint::Literal(values), _) => {
                if values.contains(value) {
                    Ok(())
                } else {
                    Err(TypeCheckFailure::new(hint.to_string(), literal_repr(value)))
                }
            }
            _ => Err(Self::mismatch(hint, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn check(value: Value, hint: &str) -> Result<(), TypeCheckFailure> {
        StructuralChecker::new().check(&value, &TypeHint::parse(hint).unwrap())
    }

    #[test]
    fn test_scalars() {
        assert!(check(json!(1), "int").is_ok());
        assert!(check(json!(1), "float").is_ok());
        assert!(check(json!(1.5), "float").is_ok());
        assert!(check(json!("x"), "str").is_ok());
        assert!(check(json!(null), "None").is_ok());
        assert!(check(json!({"a": 1}), "Any").is_ok());

        assert!(check(json!(1.5), "int").is_err());
        assert!(check(json!(true), "int").is_err());
        assert!(check(json!("1"), "int").is_err());
        assert!(check(json!(null), "str").is_err());
    }

    #[test]
    fn test_deep_value_stops_at_hint_depth() {
        let mut deep = json!(1);
        for _ in 0..1_000 {
            deep = Value::Array(vec![deep]);
        }

        assert!(check(deep.clone(), "list").is_ok());
        assert!(check(deep.clone(), "list[list[Any]]").is_ok());

        let failure = check(deep, "list[list[int]]").unwrap_err();
        assert_eq!(failure.path, "[0][0]");
        assert_eq!(failure.actual, "list");
    }

    #[test]
    fn test_nested_failure_path() {
        let failure = check(json!([1, "2", 3]), "list[int]").unwrap_err();
        assert_eq!(failure, TypeCheckFailure::new("int", "str").within("[1]"));
        assert_eq!(failure.to_string(), "expected int, got str at [1]");

        let failure = check(json!({"a": [1], "b": [2.5]}), "dict[str, list[int]]").unwrap_err();
        assert_eq!(failure.path, "['b'][0]");
        assert_eq!(failure.actual, "float");
    }

    #[test]
    fn test_root_failure_names_whole_hint() {
        let failure = check(json!("not a list"), "list[int]").unwrap_err();
        assert_eq!(failure.expected, "list[int]");
        assert_eq!(failure.actual, "str");
        assert!(failure.path.is_empty());
    }

    #[test]
    fn test_tuples() {
        assert!(check(json!([1, "a"]), "tuple[int, str]").is_ok());
        assert!(check(json!([1, 2, 3]), "tuple").is_ok());

        let failure = check(json!([1]), "tuple[int, str]").unwrap_err();
        assert_eq!(failure.actual, "list of length 1");

        let failure = check(json!(["a", "b"]), "tuple[int, str]").unwrap_err();
        assert_eq!(failure.path, "[0]");
    }

    #[test]
    fn test_optional_and_union() {
        assert!(check(json!(null), "Optional[int]").is_ok());
        assert!(check(json!(3), "int | None").is_ok());
        assert!(check(json!("x"), "int | str").is_ok());

        let failure = check(json!([1]), "int | str").unwrap_err();
        assert_eq!(failure.expected, "int | str");
        assert_eq!(failure.actual, "list");

        let failure = check(json!(["x"]), "Optional[list[int]]").unwrap_err();
        assert_eq!(failure.path, "[0]");
    }

    #[test]
    fn test_literals() {
        assert!(check(json!("add"), "Literal['add', 'mul']").is_ok());
        let failure = check(json!("sub"), "Literal['add', 'mul']").unwrap_err();
        assert_eq!(failure.actual, "'sub'");
    }

    #[test]
    fn test_type_name() {
        assert_eq!(type_name(&json!(1)), "int");
        assert_eq!(type_name(&json!(-1)), "int");
        assert_eq!(type_name(&json!(1.0)), "float");
        assert_eq!(type_name(&json!([])), "list");
        assert_eq!(type_name(&json!({})), "dict");
    }
}
