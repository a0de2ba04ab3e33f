//! Type hints and the pluggable checker that matches values against them.
//!
//! This module provides:
//! - `TypeHint`, a tagged description of a value's expected shape
//! - An annotation parser (`list[int]`, `Optional[str]`, `int | None`)
//! - The `TypeChecker` seam and the default `StructuralChecker`

mod checker;
mod hint;

pub use checker::{type_name, StructuralChecker, TypeCheckFailure, TypeChecker};
pub use hint::{TypeHint, MAX_NESTING};

#[cfg(test)]
pub use checker::MockTypeChecker;
