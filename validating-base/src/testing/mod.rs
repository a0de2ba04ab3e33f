//! Testing utilities for validated classes.
//!
//! Available to downstream crates with the `testing` feature.
//!
//! This module provides:
//! - The `ActionExample` family of example classes
//! - Recording and rejecting interceptors
//! - Assertions for call and contract errors
//! - Log capture for `tracing` output

mod assertions;
mod fixtures;
mod logs;
mod mocks;

pub use assertions::{
    assert_messages, assert_type_mismatch, assert_validator_failed, assert_violation,
};
pub use fixtures::{
    action_base, action_signature, adder_builder, invalid_builder, multiplier_builder,
    validate_action, Counter, NotAnInteger,
};
pub use logs::{capture_events, CaptureLayer, CapturedEvent};
pub use mocks::{RecordingInterceptor, RejectingInterceptor};
