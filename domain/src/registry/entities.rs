//! Registry domain entities

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Set of target kinds a tool applies to (e.g. "url", "domain").
///
/// Membership is a set, but iteration and serialization follow first-seen
/// order so that merges are deterministic and re-normalizing is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TargetTypes(Vec<String>);

impl TargetTypes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a kind; returns `false` if it was already present
    pub fn insert(&mut self, kind: impl Into<String>) -> bool {
        let kind = kind.into();
        if self.contains(&kind) {
            return false;
        }
        self.0.push(kind);
        true
    }

    /// Add every kind of `other` not already present, preserving encounter order
    pub fn union(&mut self, other: &TargetTypes) {
        for kind in &other.0 {
            self.insert(kind.clone());
        }
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.0.iter().any(|k| k == kind)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }
}

impl From<Vec<String>> for TargetTypes {
    fn from(kinds: Vec<String>) -> Self {
        kinds.into_iter().collect()
    }
}

impl From<TargetTypes> for Vec<String> {
    fn from(types: TargetTypes) -> Self {
        types.0
    }
}

impl<S: Into<String>> FromIterator<S> for TargetTypes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut types = TargetTypes::new();
        for kind in iter {
            types.insert(kind);
        }
        types
    }
}

/// One entry of the tool registry, keyed by `id`.
///
/// Only the fields the normalizer reasons about are typed. Everything else
/// (names, presets, descriptions, ...) rides along in [`extra`](Self::extra)
/// and is written back verbatim, in its original relative order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique identifier within the registry (e.g. "nmap-quick")
    pub id: String,
    /// Command template; the orchestrator substitutes `{target}` at run time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Name of the parser capability that interprets this tool's output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,
    /// Optional classification (e.g. "Web", "Recon")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Applicable target kinds. An explicit `null` reads as absent, so it
    /// is dropped on rewrite and the id becomes eligible for backfill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<TargetTypes>,
    /// Opaque pass-through fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ToolDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            command: None,
            parser: None,
            category: None,
            types: None,
            extra: Map::new(),
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_parser(mut self, parser: impl Into<String>) -> Self {
        self.parser = Some(parser.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_types<S: Into<String>>(mut self, types: impl IntoIterator<Item = S>) -> Self {
        self.types = Some(types.into_iter().collect());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn has_types(&self) -> bool {
        self.types.is_some()
    }

    /// Union `other` into this definition's types, creating the field if absent
    pub fn absorb_types(&mut self, other: &TargetTypes) {
        match self.types.as_mut() {
            Some(types) => types.union(other),
            None => self.types = Some(other.clone()),
        }
    }
}
