//! Parser capabilities
//!
//! - [`builtin`]: parsers compiled into the binary (`kv`, `csv`, `hosts`)
//! - [`ExternalCapability`]: an executable speaking JSON on stdout
//! - [`CapabilityRegistry`]: resolves names over both

pub mod builtin;
mod external;
mod registry;

pub use external::ExternalCapability;
pub use registry::{CapabilityRegistry, describe_search_path};
