//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod capability_resolver;
pub mod document_repair;
pub mod payload_reader;
pub mod registry_store;
