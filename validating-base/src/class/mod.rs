//! Runtime class descriptors with contract enforcement.
//!
//! This module contains:
//! - `ClassBuilder`, which assembles members and enforces the contract on build
//! - `Class`, the immutable descriptor shared by all its instances
//! - `Instance`, a class paired with owned state

mod builder;
#[cfg(test)]
mod class_tests;
mod descriptor;
mod instance;

pub use builder::ClassBuilder;
pub use descriptor::{Class, Member, MethodBody, MethodEntry, ValidatorHook};
pub use instance::Instance;
