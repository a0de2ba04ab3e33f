//! Contract suggestion registry mapping error codes to remediation hints.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::errors::codes;

/// Structured remediation info for a contract violation.
#[derive(Debug, Clone)]
pub struct ContractSuggestion {
    /// Error code this suggestion applies to.
    pub code: String,
    /// Short title for the error.
    pub title: String,
    /// Detailed summary of the issue.
    pub summary: String,
    /// Steps to fix the issue.
    pub fix_steps: Vec<String>,
}

impl ContractSuggestion {
    /// Creates a new contract suggestion.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        title: impl Into<String>,
        summary: impl Into<String>,
        fix_steps: Vec<String>,
    ) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            summary: summary.into(),
            fix_steps,
        }
    }
}

static SUGGESTIONS: LazyLock<RwLock<HashMap<String, ContractSuggestion>>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    map.insert(
        codes::MISSING_METHOD.to_string(),
        ContractSuggestion::new(
            codes::MISSING_METHOD,
            "Required Method Missing",
            "The contract requires a method that neither the class nor its ancestors define.",
            vec![
                "Define the method on the class with ClassBuilder::method".to_string(),
                "Or remove the name from the contract's required methods".to_string(),
            ],
        ),
    );

    map.insert(
        codes::NOT_CALLABLE.to_string(),
        ContractSuggestion::new(
            codes::NOT_CALLABLE,
            "Member Is Not Callable",
            "A required or validated name resolves to a plain attribute instead of a method.",
            vec![
                "Rename the attribute so it no longer shadows the method".to_string(),
                "Or register a method body under that name".to_string(),
            ],
        ),
    );

    map.insert(
        codes::UNIMPLEMENTED_VALIDATED.to_string(),
        ContractSuggestion::new(
            codes::UNIMPLEMENTED_VALIDATED,
            "Validated Method Not Implemented",
            "A validated method is declared but no body is registered, and strict mode is on.",
            vec![
                "Define the method".to_string(),
                "Or drop it from the validated methods".to_string(),
            ],
        ),
    );

    map.insert(
        codes::MISSING_VALIDATOR.to_string(),
        ContractSuggestion::new(
            codes::MISSING_VALIDATOR,
            "Validator Missing",
            "A method validated with a prerun mode has no validator while validators are required.",
            vec![
                "Register one with ClassBuilder::validator".to_string(),
                "Or declare the method with validate_types".to_string(),
            ],
        ),
    );

    RwLock::new(map)
});

/// Register a suggestion for a contract code.
pub fn register_suggestion(suggestion: ContractSuggestion) {
    SUGGESTIONS.write().insert(suggestion.code.clone(), suggestion);
}

/// Return suggestion metadata for an error code if registered.
#[must_use]
pub fn get_contract_suggestion(code: &str) -> Option<ContractSuggestion> {
    SUGGESTIONS.read().get(code).cloned()
}

/// Returns all registered suggestions.
#[must_use]
pub fn list_suggestions() -> Vec<ContractSuggestion> {
    SUGGESTIONS.read().values().cloned().collect()
}
