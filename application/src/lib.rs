//! Application layer for target-panel
//!
//! This crate contains the two use cases (registry normalization and parser
//! invocation) and the port definitions their adapters implement.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    capability_resolver::CapabilityResolverPort,
    document_repair::{AppliedRepair, DocumentRepairPort, RepairReport},
    payload_reader::{PayloadReaderPort, PayloadSource},
    registry_store::{RegistryStorePort, StoreError},
};
pub use use_cases::invoke_parser::{InvokeParserInput, InvokeParserOutput, InvokeParserUseCase};
pub use use_cases::normalize_registry::{
    NormalizeError, NormalizeRegistryInput, NormalizeRegistryOutput, NormalizeRegistryUseCase,
    WriteMode,
};
