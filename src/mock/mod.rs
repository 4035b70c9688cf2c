//! Mock Generator Implementation
//!
//! In-process stand-in for the generator collaborator, used by unit and
//! integration tests. Records every command it receives and hands out
//! configurable results.
//!
//! # Failure injection
//!
//! - `take_build_targets` / `take_configuration` can report extraction errors
//!   while still returning their value
//! - `requires_new_reader` is a settable flag

mod failure;
mod generator;

pub use failure::{ExtractionFailures, FailurePoint};
pub use generator::{GeneratorCall, MockGenerator};
