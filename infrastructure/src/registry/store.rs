//! File-backed registry store
//!
//! Reads the registry as UTF-8 text and writes the canonical form as
//! 2-space indented JSON with a trailing newline. A failed repair is saved
//! next to the registry as `<stem><suffix>.<ext>` (e.g.
//! `tools_fixed_attempt.json`); the registry itself is never touched then.

use panel_application::ports::registry_store::{RegistryStorePort, StoreError};
use panel_domain::ToolDefinition;
use std::path::PathBuf;

/// Registry store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct FileRegistryStore {
    path: PathBuf,
    attempt_suffix: String,
}

impl FileRegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            attempt_suffix: "_fixed_attempt".to_string(),
        }
    }

    pub fn with_attempt_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.attempt_suffix = suffix.into();
        self
    }

    /// Sibling path for the failed-repair artifact
    pub fn attempt_path(&self) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "registry".to_string());
        let name = match self.path.extension() {
            Some(ext) => format!("{}{}.{}", stem, self.attempt_suffix, ext.to_string_lossy()),
            None => format!("{}{}", stem, self.attempt_suffix),
        };
        self.path.with_file_name(name)
    }
}

impl RegistryStorePort for FileRegistryStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn read_raw(&self) -> Result<String, StoreError> {
        std::fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })
    }

    fn render(&self, definitions: &[ToolDefinition]) -> Result<String, StoreError> {
        let mut rendered = serde_json::to_string_pretty(definitions)
            .map_err(|e| StoreError::Encode(e.to_string()))?;
        rendered.push('\n');
        Ok(rendered)
    }

    fn write_canonical(&self, rendered: &str) -> Result<(), StoreError> {
        std::fs::write(&self.path, rendered).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn write_attempt(&self, text: &str) -> Result<PathBuf, StoreError> {
        let path = self.attempt_path();
        std::fs::write(&path, text).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
