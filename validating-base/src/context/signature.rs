//! Method signatures and argument binding.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::arguments::CallArgs;
use crate::errors::{BindingError, HintParseError};
use crate::types::TypeHint;

/// How a parameter may be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// By position or by name.
    #[default]
    PositionalOrKeyword,
    /// By name only.
    KeywordOnly,
}

/// A declared method parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// The parameter name.
    pub name: String,
    /// The declared type.
    #[serde(default = "any_hint")]
    pub hint: TypeHint,
    /// Value used when the caller omits the parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// How the parameter may be supplied.
    #[serde(default)]
    pub kind: ParamKind,
}

fn any_hint() -> TypeHint {
    TypeHint::Any
}

impl Parameter {
    /// Creates a positional-or-keyword parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, hint: TypeHint) -> Self {
        Self {
            name: name.into(),
            hint,
            default: None,
            kind: ParamKind::PositionalOrKeyword,
        }
    }

    /// Creates a parameter from annotation text.
    pub fn parse(name: impl Into<String>, hint: &str) -> Result<Self, HintParseError> {
        Ok(Self::new(name, TypeHint::parse(hint)?))
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Makes the parameter keyword-only.
    #[must_use]
    pub fn keyword_only(mut self) -> Self {
        self.kind = ParamKind::KeywordOnly;
        self
    }
}

/// A method's declared parameters and return type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    params: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    returns: Option<TypeHint>,
}

/// One bound argument.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArgument {
    /// The parameter name.
    pub name: String,
    /// The value, supplied or defaulted.
    pub value: Value,
    /// The declared type.
    pub hint: TypeHint,
    /// False when the value came from the parameter's default.
    pub supplied: bool,
}

impl Signature {
    /// Creates an empty signature with no return hint.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a signature from annotation text.
    ///
    /// ```rust
    /// use validating_base::context::Signature;
    ///
    /// let sig = Signature::from_hints(&[("number_list", "list[int]")], Some("int")).unwrap();
    /// assert_eq!(sig.params().len(), 1);
    /// ```
    pub fn from_hints(params: &[(&str, &str)], returns: Option<&str>) -> Result<Self, HintParseError> {
        let mut signature = Self::new();
        for (name, hint) in params {
            signature = signature.param(Parameter::parse(*name, hint)?);
        }
        if let Some(hint) = returns {
            signature = signature.returns(TypeHint::parse(hint)?);
        }
        Ok(signature)
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Sets the return type.
    #[must_use]
    pub fn returns(mut self, hint: TypeHint) -> Self {
        self.returns = Some(hint);
        self
    }

    /// The declared parameters.
    #[must_use]
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// The declared return type, if any.
    #[must_use]
    pub fn return_hint(&self) -> Option<&TypeHint> {
        self.returns.as_ref()
    }

    /// Matches supplied arguments to the declared parameters.
    ///
    /// Positional values fill positional parameters in order, keywords fill
    /// by name, and defaults fill whatever remains. The result follows
    /// declaration order.
    pub fn bind(&self, method: &str, args: CallArgs) -> Result<Vec<BoundArgument>, BindingError> {
        let (positional, keyword) = args.into_parts();

        let positional_slots: Vec<usize> = self
            .params
            .iter()
            .enumerate()
            .filter(|(_, p)| p.kind == ParamKind::PositionalOrKeyword)
            .map(|(i, _)| i)
            .collect();

        if positional.len() > positional_slots.len() {
            return Err(BindingError::TooManyPositional {
                method: method.to_string(),
                expected: positional_slots.len(),
                got: positional.len(),
            });
        }

        let mut slots: Vec<Option<Value>> = vec![None; self.params.len()];
        for (slot, value) in positional_slots.iter().zip(positional) {
            slots[*slot] = Some(value);
        }

        for (name, value) in keyword {
            let index = self
                .params
                .iter()
                .position(|p| p.name == name)
                .ok_or_else(|| BindingError::UnexpectedKeyword {
                    method: method.to_string(),
                    name: name.clone(),
                })?;
            if slots[index].is_some() {
                return Err(BindingError::Duplicate {
                    method: method.to_string(),
                    name,
                });
            }
            slots[index] = Some(value);
        }

        let missing: Vec<String> = self
            .params
            .iter()
            .zip(&slots)
            .filter(|(p, slot)| slot.is_none() && p.default.is_none())
            .map(|(p, _)| p.name.clone())
            .collect();
        if !missing.is_empty() {
            return Err(BindingError::Missing {
                method: method.to_string(),
                names: missing,
            });
        }

        Ok(self
            .params
            .iter()
            .zip(slots)
            .map(|(param, slot)| {
                let supplied = slot.is_some();
                BoundArgument {
                    name: param.name.clone(),
                    value: slot.or_else(|| param.default.clone()).unwrap_or(Value::Null),
                    hint: param.hint.clone(),
                    supplied,
                }
            })
            .collect())
    }
}
