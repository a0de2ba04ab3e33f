//! # validating-base
//!
//! Runtime contracts for classes assembled at runtime.
//!
//! A base class declares which methods its subclasses must implement and
//! which methods are validated on every call:
//!
//! - **Required methods**: checked once, when the class is built
//! - **Validated methods**: arguments type-checked, a custom validator run,
//!   then the return value type-checked, around every call
//! - **Pluggable checking**: the `TypeChecker` trait can be swapped per class
//! - **Interceptors**: extra per-class hooks around validated calls
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use validating_base::prelude::*;
//!
//! let base: ClassBuilder<()> = ClassBuilder::new("ActionExample")
//!     .contract(Contract::new().require("action").validate("action"))
//!     .validator("action", |_, call| {
//!         let numbers: Vec<serde_json::Value> = call.value("number_list")?;
//!         anyhow::ensure!(numbers.iter().all(|n| n.is_i64()), "not all integers");
//!         Ok(())
//!     });
//!
//! let adder = base
//!     .extend("AdderExample")
//!     .method(
//!         "action",
//!         Signature::from_hints(&[("number_list", "list")], Some("int"))?,
//!         |_, call| {
//!             let numbers: Vec<i64> = call.value("number_list")?;
//!             Ok(json!(numbers.iter().sum::<i64>()))
//!         },
//!     )
//!     .build()?;
//!
//! let mut instance = adder.instantiate(());
//! assert_eq!(instance.call("action", json!([1, 2, 3]))?, json!(6));
//! assert!(instance.call("action", json!([1, "x", 3])).is_err());
//! assert!(instance.call("action", json!("not a list")).is_err());
//! # Ok::<(), validating_base::errors::ValidatingError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod class;
pub mod config;
pub mod context;
pub mod contracts;
pub mod errors;
pub mod interceptors;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod types;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::class::{Class, ClassBuilder, Instance, Member};
    pub use crate::config::ValidationConfig;
    pub use crate::context::{BoundCall, CallArgs, Parameter, Signature};
    pub use crate::contracts::{Contract, ValidationMode};
    pub use crate::errors::{
        CallError, ContractErrorInfo, ContractViolation, MismatchKind, ProblemKind,
        TypeMismatch, ValidatingError,
    };
    pub use crate::interceptors::{CallInterceptor, InterceptorChain};
    pub use crate::types::{StructuralChecker, TypeChecker, TypeHint};
}
