//! Registry Store port
//!
//! Defines how the normalizer reads the raw registry document and writes the
//! canonical form (or a diagnostic artifact) back.

use panel_domain::ToolDefinition;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a registry store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read registry {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode registry: {0}")]
    Encode(String),
}

/// Port for the registry document store
///
/// Each run assumes exclusive access; callers serialize runs.
pub trait RegistryStorePort {
    /// Human-readable location of the canonical store
    fn location(&self) -> String;

    /// Read the raw, possibly malformed, document
    fn read_raw(&self) -> Result<String, StoreError>;

    /// Render definitions in canonical form without writing them
    fn render(&self, definitions: &[ToolDefinition]) -> Result<String, StoreError>;

    /// Overwrite the canonical store with rendered text
    fn write_canonical(&self, rendered: &str) -> Result<(), StoreError>;

    /// Persist a partially repaired document next to the store.
    ///
    /// Returns where it was written. The canonical store is left untouched.
    fn write_attempt(&self, text: &str) -> Result<PathBuf, StoreError>;
}
