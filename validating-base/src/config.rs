//! Configuration for contract enforcement.

use serde::{Deserialize, Serialize};

/// Switches applied to a class on top of each method's validation mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Whether supplied arguments are type-checked.
    #[serde(default = "default_true")]
    pub check_arguments: bool,
    /// Whether return values are type-checked.
    #[serde(default = "default_true")]
    pub check_returns: bool,
    /// Whether custom validators run.
    #[serde(default = "default_true")]
    pub run_validators: bool,
    /// Unimplemented validated methods fail the build instead of warning.
    #[serde(default)]
    pub strict: bool,
    /// Prerun-validated methods must have a validator.
    #[serde(default)]
    pub require_validators: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            check_arguments: true,
            check_returns: true,
            run_validators: true,
            strict: false,
            require_validators: false,
        }
    }
}

impl ValidationConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables strict mode.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Requires a validator for every prerun-validated method.
    #[must_use]
    pub fn require_validators(mut self) -> Self {
        self.require_validators = true;
        self
    }

    /// Enables or disables argument type checks.
    #[must_use]
    pub fn with_argument_checks(mut self, enabled: bool) -> Self {
        self.check_arguments = enabled;
        self
    }

    /// Enables or disables return type checks.
    #[must_use]
    pub fn with_return_checks(mut self, enabled: bool) -> Self {
        self.check_returns = enabled;
        self
    }

    /// Enables or disables custom validators.
    #[must_use]
    pub fn with_validators(mut self, enabled: bool) -> Self {
        self.run_validators = enabled;
        self
    }
}
