//! Arguments supplied by a caller.

use serde_json::Value;

/// Positional and keyword arguments for one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    positional: Vec<Value>,
    keyword: Vec<(String, Value)>,
}

impl CallArgs {
    /// Creates an empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an argument list from positional values.
    #[must_use]
    pub fn positional(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            positional: values.into_iter().collect(),
            keyword: Vec::new(),
        }
    }

    /// Creates an argument list from keyword values.
    ///
    /// ```rust
    /// use serde_json::json;
    /// use validating_base::context::CallArgs;
    ///
    /// let args = CallArgs::keywords([("name", json!("Ada"))]);
    /// assert_eq!(args, CallArgs::new().kwarg("name", json!("Ada")));
    /// ```
    #[must_use]
    pub fn keywords<K: Into<String>>(values: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self {
            positional: Vec::new(),
            keyword: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn arg(mut self, value: Value) -> Self {
        self.positional.push(value);
        self
    }

    /// Appends a keyword argument.
    #[must_use]
    pub fn kwarg(mut self, name: impl Into<String>, value: Value) -> Self {
        self.keyword.push((name.into(), value));
        self
    }

    /// Total number of supplied arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positional.len() + self.keyword.len()
    }

    /// Returns true if no arguments were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<Value>, Vec<(String, Value)>) {
        (self.positional, self.keyword)
    }
}

impl From<Vec<Value>> for CallArgs {
    fn from(values: Vec<Value>) -> Self {
        Self::positional(values)
    }
}

impl From<Value> for CallArgs {
    /// Any value, objects included, is a single positional argument.
    fn from(value: Value) -> Self {
        Self::positional([value])
    }
}
