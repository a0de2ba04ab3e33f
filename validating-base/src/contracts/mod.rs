//! Contract declarations and remediation hints for contract violations.
//!
//! This module provides:
//! - The `Contract` a class attaches to itself (required and validated methods)
//! - Per-method validation modes
//! - A suggestion registry keyed by contract error code

mod declaration;
mod suggestions;

pub use declaration::{Contract, ValidatedEntry, ValidationMode};
pub use suggestions::{
    get_contract_suggestion, list_suggestions, register_suggestion, ContractSuggestion,
};
