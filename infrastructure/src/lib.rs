//! Infrastructure layer for target-panel
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: configuration file loading, the file-backed
//! registry store, structural repair rules, parser capabilities and the
//! payload reader.

pub mod config;
pub mod parsers;
pub mod payload;
pub mod registry;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileParserConfig, FileRegistryConfig,
    FileRepairConfig,
};
pub use parsers::{CapabilityRegistry, ExternalCapability, describe_search_path};
pub use payload::StdPayloadReader;
pub use registry::{FileRegistryStore, RegexRepairRule, StructuralRepairer};
