//! Declared type hints and their annotation-text parser.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::HintParseError;

/// A declared type for a parameter or return value.
///
/// Hints describe the shape of a dynamic [`serde_json::Value`]. They can be
/// built directly or parsed from annotation text:
///
/// ```rust
/// use validating_base::types::TypeHint;
///
/// let hint: TypeHint = "dict[str, list[int]] | None".parse().unwrap();
/// assert_eq!(hint, TypeHint::optional(TypeHint::dict(TypeHint::list(TypeHint::Int))));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeHint {
    /// Accepts any value.
    Any,
    /// Only `null`.
    None,
    /// A boolean.
    Bool,
    /// An integral number.
    Int,
    /// Any number (integers are accepted as floats).
    Float,
    /// A string.
    Str,
    /// An array whose items all match.
    List(Box<TypeHint>),
    /// An array; `Some` fixes arity and per-position types.
    Tuple(Option<Vec<TypeHint>>),
    /// An object whose values all match. Keys are always strings.
    Dict(Box<TypeHint>),
    /// `null` or the inner hint.
    Optional(Box<TypeHint>),
    /// Any one of the options.
    Union(Vec<TypeHint>),
    /// Exactly one of the listed values.
    Literal(Vec<serde_json::Value>),
}

impl TypeHint {
    /// `list[item]`.
    #[must_use]
    pub fn list(item: Self) -> Self {
        Self::List(Box::new(item))
    }

    /// `dict[str, value]`.
    #[must_use]
    pub fn dict(value: Self) -> Self {
        Self::Dict(Box::new(value))
    }

    /// `tuple[items...]`.
    #[must_use]
    pub fn tuple(items: Vec<Self>) -> Self {
        Self::Tuple(Some(items))
    }

    /// `Optional[inner]`.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// `Union[options...]`, normalised.
    ///
    /// Nested unions are flattened, duplicates dropped, a single option is
    /// returned as-is, and `X | None` becomes `Optional[X]`.
    #[must_use]
    pub fn union(options: Vec<Self>) -> Self {
        let mut flat: Vec<Self> = Vec::new();
        for option in options {
            let expanded = match option {
                Self::Union(inner) => inner,
                Self::Optional(inner) => vec![*inner, Self::None],
                other => vec![other],
            };
            for hint in expanded {
                if !flat.contains(&hint) {
                    flat.push(hint);
                }
            }
        }

        if flat.contains(&Self::Any) {
            return Self::Any;
        }

        match flat.len() {
            0 => Self::None,
            1 => flat.remove(0),
            2 if flat.contains(&Self::None) => {
                let inner = flat.into_iter().find(|h| *h != Self::None).unwrap_or(Self::None);
                Self::optional(inner)
            }
            _ => Self::Union(flat),
        }
    }

    /// `Literal[values...]`.
    #[must_use]
    pub fn literal(values: Vec<serde_json::Value>) -> Self {
        Self::Literal(values)
    }

    /// Parses annotation text such as `list[int]` or `Optional[str]`.
    pub fn parse(input: &str) -> Result<Self, HintParseError> {
        let mut parser = Parser::new(input);
        let hint = parser.union()?;
        parser.skip_whitespace();
        if parser.pos < input.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(hint)
    }

    /// Returns true if this hint accepts every value.
    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl FromStr for TypeHint {
    type Err = HintParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::None => f.write_str("None"),
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Str => f.write_str("str"),
            Self::List(item) => write!(f, "list[{item}]"),
            Self::Tuple(None) => f.write_str("tuple"),
            Self::Tuple(Some(items)) => write!(f, "tuple[{}]", join(items)),
            Self::Dict(value) => write!(f, "dict[str, {value}]"),
            Self::Optional(inner) => write!(f, "Optional[{inner}]"),
            Self::Union(options) => {
                let parts: Vec<String> = options.iter().map(ToString::to_string).collect();
                f.write_str(&parts.join(" | "))
            }
            Self::Literal(values) => {
                let parts: Vec<String> = values.iter().map(literal_repr).collect();
                write!(f, "Literal[{}]", parts.join(", "))
            }
        }
    }
}

fn join(items: &[TypeHint]) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Renders a literal value the way it is written in a hint.
pub(crate) fn literal_repr(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "None".to_string(),
        serde_json::Value::Bool(true) => "True".to_string(),
        serde_json::Value::Bool(false) => "False".to_string(),
        serde_json::Value::String(s) => format!("'{s}'"),
        other => other.to_string(),
    }
}

/// Deepest bracket nesting the parser accepts.
pub const MAX_NESTING: usize = 64;

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0, depth: 0 }
    }

    fn error(&self, reason: impl Into<String>) -> HintParseError {
        HintParseError::new(self.input, self.pos, reason)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.rest().chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), HintParseError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{expected}'")))
        }
    }

    fn ident(&mut self) -> Result<&'a str, HintParseError> {
        self.skip_whitespace();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected a type name"));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn union(&mut self) -> Result<TypeHint, HintParseError> {
        let mut options = vec![self.primary()?];
        while self.eat('|') {
            options.push(self.primary()?);
        }
        if options.len() == 1 {
            Ok(options.remove(0))
        } else {
            Ok(TypeHint::union(options))
        }
    }

    fn arguments(&mut self) -> Result<Vec<TypeHint>, HintParseError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error("hint nested too deeply"));
        }
        self.depth += 1;
        let mut args = vec![self.union()?];
        while self.eat(',') {
            args.push(self.union()?);
        }
        self.expect(']')?;
        self.depth -= 1;
        Ok(args)
    }

    fn primary(&mut self) -> Result<TypeHint, HintParseError> {
        let start = self.pos;
        let raw = self.ident()?;
        let name = raw.strip_prefix("typing.").unwrap_or(raw);
        let subscripted = self.eat('[');

        let hint = match (name, subscripted) {
            ("Any" | "object", false) => TypeHint::Any,
            ("None" | "NoneType", false) => TypeHint::None,
            ("bool", false) => TypeHint::Bool,
            ("int", false) => TypeHint::Int,
            ("float", false) => TypeHint::Float,
            ("str", false) => TypeHint::Str,
            ("list" | "List", false) => TypeHint::list(TypeHint::Any),
            ("dict" | "Dict", false) => TypeHint::dict(TypeHint::Any),
            ("tuple" | "Tuple", false) => TypeHint::Tuple(None),
            ("list" | "List", true) => {
                let args = self.arguments()?;
                let [item] = <[TypeHint; 1]>::try_from(args)
                    .map_err(|_| self.error("list takes exactly one argument"))?;
                TypeHint::list(item)
            }
            ("dict" | "Dict", true) => {
                let args = self.arguments()?;
                let [key, value] = <[TypeHint; 2]>::try_from(args)
                    .map_err(|_| self.error("dict takes exactly two arguments"))?;
                if !matches!(key, TypeHint::Str | TypeHint::Any) {
                    return Err(HintParseError::new(
                        self.input,
                        start,
                        format!("dict keys must be str, not {key}"),
                    ));
                }
                TypeHint::dict(value)
            }
            ("tuple" | "Tuple", true) => TypeHint::tuple(self.arguments()?),
            ("Optional", true) => {
                let args = self.arguments()?;
                let [inner] = <[TypeHint; 1]>::try_from(args)
                    .map_err(|_| self.error("Optional takes exactly one argument"))?;
                TypeHint::optional(inner)
            }
            ("Union", true) => TypeHint::union(self.arguments()?),
            ("Literal", true) => TypeHint::literal(self.literals()?),
            (_, true) => {
                return Err(HintParseError::new(
                    self.input,
                    start,
                    format!("'{name}' cannot be subscripted"),
                ))
            }
            (_, false) => {
                return Err(HintParseError::new(
                    self.input,
                    start,
                    format!("unknown type '{name}'"),
                ))
            }
        };
        Ok(hint)
    }

    fn literals(&mut self) -> Result<Vec<serde_json::Value>, HintParseError> {
        let mut values = vec![self.literal()?];
        while self.eat(',') {
            values.push(self.literal()?);
        }
        self.expect(']')?;
        Ok(values)
    }

    fn literal(&mut self) -> Result<serde_json::Value, HintParseError> {
        match self.peek() {
            Some(quote @ ('\'' | '"')) => {
                self.pos += 1;
                let rest = self.rest();
                let end = rest
                    .find(quote)
                    .ok_or_else(|| self.error("unterminated string literal"))?;
                let text = &rest[..end];
                self.pos += end + 1;
                Ok(serde_json::Value::String(text.to_string()))
            }
            Some(c) if c == '-' || c.is_ascii_digit() => {
                let rest = self.rest();
                let len = rest
                    .char_indices()
                    .skip(1)
                    .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
                    .map_or(rest.len(), |(i, _)| i);
                let text = &rest[..len];
                let value = serde_json::from_str::<serde_json::Number>(text)
                    .map_err(|_| self.error(format!("invalid number literal '{text}'")))?;
                self.pos += len;
                Ok(serde_json::Value::Number(value))
            }
            _ => match self.ident()? {
                "True" => Ok(serde_json::Value::Bool(true)),
                "False" => Ok(serde_json::Value::Bool(false)),
                "None" => Ok(serde_json::Value::Null),
                other => Err(self.error(format!("'{other}' is not a literal value"))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_scalars() {
        assert_eq!(TypeHint::parse("int").unwrap(), TypeHint::Int);
        assert_eq!(TypeHint::parse(" str ").unwrap(), TypeHint::Str);
        assert_eq!(TypeHint::parse("None").unwrap(), TypeHint::None);
        assert_eq!(TypeHint::parse("typing.Any").unwrap(), TypeHint::Any);
        assert_eq!(TypeHint::parse("object").unwrap(), TypeHint::Any);
    }

    #[test]
    fn test_parse_generics() {
        assert_eq!(
            TypeHint::parse("list[int]").unwrap(),
            TypeHint::list(TypeHint::Int)
        );
        assert_eq!(
            TypeHint::parse("Dict[str, List[float]]").unwrap(),
            TypeHint::dict(TypeHint::list(TypeHint::Float))
        );
        assert_eq!(
            TypeHint::parse("tuple[int, str]").unwrap(),
            TypeHint::tuple(vec![TypeHint::Int, TypeHint::Str])
        );
        assert_eq!(TypeHint::parse("list").unwrap(), TypeHint::list(TypeHint::Any));
        assert_eq!(TypeHint::parse("tuple").unwrap(), TypeHint::Tuple(None));
    }

    #[test]
    fn test_parse_unions_normalise() {
        assert_eq!(
            TypeHint::parse("int | None").unwrap(),
            TypeHint::optional(TypeHint::Int)
        );
        assert_eq!(
            TypeHint::parse("Optional[int]").unwrap(),
            TypeHint::parse("Union[int, None]").unwrap()
        );
        assert_eq!(
            TypeHint::parse("int | str | int").unwrap(),
            TypeHint::Union(vec![TypeHint::Int, TypeHint::Str])
        );
        assert_eq!(TypeHint::parse("int | Any").unwrap(), TypeHint::Any);
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(
            TypeHint::parse("Literal['add', \"mul\", 3, -1, True, None]").unwrap(),
            TypeHint::literal(vec![
                json!("add"),
                json!("mul"),
                json!(3),
                json!(-1),
                json!(true),
                json!(null)
            ])
        );
    }

    #[test]
    fn test_parse_errors() {
        let err = TypeHint::parse("list[int").unwrap_err();
        assert!(err.reason.contains("expected ']'"));

        let err = TypeHint::parse("dict[int, str]").unwrap_err();
        assert!(err.reason.contains("dict keys must be str"));

        let err = TypeHint::parse("Frobnicate").unwrap_err();
        assert_eq!(err.offset, 0);
        assert!(err.reason.contains("unknown type"));

        assert!(TypeHint::parse("int]").is_err());
        assert!(TypeHint::parse("").is_err());
        assert!(TypeHint::parse("int[str]").is_err());
        assert!(TypeHint::parse("list[int, str]").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}int{}", "list[".repeat(depth), "]".repeat(depth));

        let hint = TypeHint::parse(&nested(MAX_NESTING)).unwrap();
        assert!(matches!(hint, TypeHint::List(_)));

        let err = TypeHint::parse(&nested(MAX_NESTING + 1)).unwrap_err();
        assert!(err.reason.contains("nested too deeply"));
        assert_eq!(err.offset, (MAX_NESTING + 1) * "list[".len());

        let err = TypeHint::parse(&nested(20_000)).unwrap_err();
        assert!(err.reason.contains("nested too deeply"));
    }

    #[test]
    fn test_is_any() {
        assert!(TypeHint::parse("typing.Any").unwrap().is_any());
        assert!(!TypeHint::parse("list[Any]").unwrap().is_any());
        assert!(!TypeHint::Int.is_any());
    }

    #[test]
    fn test_display_reparses() {
        for text in [
            "list[int]",
            "dict[str, Optional[float]]",
            "tuple[int, str]",
            "int | str",
            "Literal['a', 1]",
        ] {
            let hint = TypeHint::parse(text).unwrap();
            assert_eq!(hint.to_string(), text);
            assert_eq!(TypeHint::parse(&hint.to_string()).unwrap(), hint);
        }
    }

    #[test]
    fn test_serde_shape() {
        let hint = TypeHint::optional(TypeHint::list(TypeHint::Int));
        let value = serde_json::to_value(&hint).unwrap();
        assert_eq!(value, json!({"optional": {"list": "int"}}));

        let back: TypeHint = serde_json::from_value(value).unwrap();
        assert_eq!(back, hint);
    }
}
