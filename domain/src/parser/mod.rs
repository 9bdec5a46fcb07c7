//! Parser domain module
//!
//! Defines the contract between the invocation adapter and the set of
//! name-addressed parsing capabilities it dispatches to.
//!
//! - [`ParserCapability`]: `parse(raw, options) -> Value`
//! - [`CapabilityError`]: resolution vs. invocation failures
//! - [`InvocationResult`] / [`InvocationStatus`]: the normalized envelope
//!   and its exit code

pub mod capability;
pub mod result;

pub use capability::{CapabilityError, ParseOptions, ParserCapability, qualify, validate_name};
pub use result::{InvocationResult, InvocationStatus};
