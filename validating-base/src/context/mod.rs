//! Call context: supplied arguments, declared signatures, and the bound call.
//!
//! This module provides:
//! - `CallArgs`, the positional and keyword values a caller supplies
//! - `Signature` and `Parameter`, a method's declared parameters and return type
//! - `BoundCall`, the transient record of one call's resolved arguments

mod arguments;
mod bound;
mod signature;

pub use arguments::CallArgs;
pub use bound::BoundCall;
pub use signature::{BoundArgument, ParamKind, Parameter, Signature};
