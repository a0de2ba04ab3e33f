//! Class-level contract declarations.

use serde::{Deserialize, Serialize};

/// Which checks run for a validated method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Argument and return type checks only.
    Types,
    /// The custom validator only.
    Prerun,
    /// Type checks and the custom validator.
    #[default]
    Full,
}

impl ValidationMode {
    /// Returns true if argument and return types are checked.
    #[must_use]
    pub const fn checks_types(self) -> bool {
        matches!(self, Self::Types | Self::Full)
    }

    /// Returns true if the custom validator runs.
    #[must_use]
    pub const fn runs_prerun(self) -> bool {
        matches!(self, Self::Prerun | Self::Full)
    }

    /// Combines two declarations for the same method.
    #[must_use]
    pub const fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Self::Types, Self::Types) => Self::Types,
            (Self::Prerun, Self::Prerun) => Self::Prerun,
            _ => Self::Full,
        }
    }
}

/// A validated method name and its mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedEntry {
    /// The method name.
    pub name: String,
    /// Which checks run.
    #[serde(default)]
    pub mode: ValidationMode,
}

/// The required and validated method declarations of a class.
///
/// Both lists keep declaration order and never hold the same name twice.
///
/// ```rust
/// use validating_base::contracts::{Contract, ValidationMode};
///
/// let contract = Contract::new().require("action").validate("action");
/// assert_eq!(contract.required_methods(), ["action"]);
/// assert_eq!(contract.mode_of("action"), Some(ValidationMode::Full));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    #[serde(default)]
    required_methods: Vec<String>,
    #[serde(default)]
    validated_methods: Vec<ValidatedEntry>,
}

impl Contract {
    /// Creates an empty contract.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a method every concrete class must define.
    #[must_use]
    pub fn require(mut self, name: impl Into<String>) -> Self {
        self.add_required(name.into());
        self
    }

    /// Declares a method whose calls are type-checked and validated.
    #[must_use]
    pub fn validate(self, name: impl Into<String>) -> Self {
        self.with_mode(name, ValidationMode::Full)
    }

    /// Declares a method whose calls are only type-checked.
    #[must_use]
    pub fn validate_types(self, name: impl Into<String>) -> Self {
        self.with_mode(name, ValidationMode::Types)
    }

    /// Declares a method whose calls only run the custom validator.
    #[must_use]
    pub fn validate_prerun(self, name: impl Into<String>) -> Self {
        self.with_mode(name, ValidationMode::Prerun)
    }

    /// Declares a validated method with an explicit mode.
    #[must_use]
    pub fn with_mode(mut self, name: impl Into<String>, mode: ValidationMode) -> Self {
        self.add_validated(name.into(), mode);
        self
    }

    fn add_required(&mut self, name: String) {
        if !self.required_methods.contains(&name) {
            self.required_methods.push(name);
        }
    }

    fn add_validated(&mut self, name: String, mode: ValidationMode) {
        if let Some(entry) = self.validated_methods.iter_mut().find(|e| e.name == name) {
            entry.mode = entry.mode.combine(mode);
        } else {
            self.validated_methods.push(ValidatedEntry { name, mode });
        }
    }

    /// Adds another contract's declarations after this one's.
    pub fn merge(&mut self, other: &Self) {
        for name in &other.required_methods {
            self.add_required(name.clone());
        }
        for entry in &other.validated_methods {
            self.add_validated(entry.name.clone(), entry.mode);
        }
    }

    /// The required method names.
    #[must_use]
    pub fn required_methods(&self) -> &[String] {
        &self.required_methods
    }

    /// The validated method declarations.
    #[must_use]
    pub fn validated_methods(&self) -> &[ValidatedEntry] {
        &self.validated_methods
    }

    /// Returns the mode of a validated method.
    #[must_use]
    pub fn mode_of(&self, name: &str) -> Option<ValidationMode> {
        self.validated_methods
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.mode)
    }

    /// Returns true if `name` is required.
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required_methods.iter().any(|n| n == name)
    }

    /// Returns true if `name` is validated.
    #[must_use]
    pub fn is_validated(&self, name: &str) -> bool {
        self.mode_of(name).is_some()
    }

    /// Returns true if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.required_methods.is_empty() && self.validated_methods.is_empty()
    }
}
