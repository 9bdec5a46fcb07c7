//! Parser capability abstraction
//!
//! A capability is a name-addressed routine implementing
//! `parse(raw) -> structured data`. Capabilities are resolved lazily by
//! qualified name (`<namespace>.<name>`); a tool definition's `parser` field
//! is only a soft reference, so an unknown name is a normal runtime outcome.
//!
//! Two error classes are kept apart because callers branch on them:
//!
//! | Variant | When | Payload read? |
//! |---------|------|---------------|
//! | [`CapabilityError::InvalidName`] / [`NotFound`](CapabilityError::NotFound) / [`LoadFailed`](CapabilityError::LoadFailed) | resolution | no |
//! | [`CapabilityError::ParseFailed`] | invocation | yes |

use serde_json::Value;
use thiserror::Error;

/// Error type for capability resolution and invocation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// The name can never resolve (empty, path separators, whitespace)
    #[error("invalid parser name '{0}'")]
    InvalidName(String),

    /// Nothing provides the qualified name
    #[error("no capability named '{0}' found")]
    NotFound(String),

    /// A provider exists but could not be loaded
    #[error("capability '{name}' could not be loaded: {reason}")]
    LoadFailed { name: String, reason: String },

    /// The capability ran and rejected the payload
    #[error("{0}")]
    ParseFailed(String),
}

impl CapabilityError {
    pub fn parse_failed(message: impl Into<String>) -> Self {
        Self::ParseFailed(message.into())
    }

    /// Whether this error happened before the payload was touched
    pub fn is_resolution_error(&self) -> bool {
        !matches!(self, CapabilityError::ParseFailed(_))
    }
}

/// Options passed to every capability call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Suppress diagnostic chatter from the capability
    pub quiet: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { quiet: true }
    }
}

/// A resolved parsing routine
pub trait ParserCapability: Send + Sync {
    /// Qualified name this capability answers to (e.g. "jc.parsers.kv")
    fn qualified_name(&self) -> &str;

    /// Parse raw text into structured data
    fn parse(&self, raw: &str, options: ParseOptions) -> Result<Value, CapabilityError>;
}

/// Compose the qualified capability name for `name` under `namespace`
pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", namespace, name)
    }
}

/// Check that a caller-supplied parser name could ever resolve
pub fn validate_name(name: &str) -> Result<(), CapabilityError> {
    let bad = name.is_empty()
        || name
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_whitespace() || c.is_control())
        || name == "."
        || name == "..";
    if bad {
        Err(CapabilityError::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}
