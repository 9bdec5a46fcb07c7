//! Backfill of fields lost to structural repair
//!
//! Excising an orphaned fragment can throw away the only `types` a tool ever
//! had. A [`BackfillPolicy`] restores a fixed default for known ids once the
//! merge is done. Ids outside the policy are never touched.

use serde::{Deserialize, Serialize};

use super::entities::{TargetTypes, ToolDefinition};

/// Default `types` for one known tool id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillRule {
    pub id: String,
    pub types: Vec<String>,
}

impl BackfillRule {
    pub fn new<S: Into<String>>(id: impl Into<String>, types: impl IntoIterator<Item = S>) -> Self {
        Self {
            id: id.into(),
            types: types.into_iter().map(Into::into).collect(),
        }
    }
}

/// Set of backfill rules applied after merging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackfillPolicy {
    rules: Vec<BackfillRule>,
}

impl BackfillPolicy {
    pub fn new(rules: Vec<BackfillRule>) -> Self {
        Self { rules }
    }

    /// Policy that never backfills anything
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Ids whose fragments the excision rule is known to drop
    pub fn default_rules() -> Vec<BackfillRule> {
        vec![
            BackfillRule::new("whatweb", ["url", "domain"]),
            BackfillRule::new("nikto", ["url", "domain"]),
        ]
    }

    pub fn rules(&self) -> &[BackfillRule] {
        &self.rules
    }

    fn rule_for(&self, id: &str) -> Option<&BackfillRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Fill `types` on every covered definition that still lacks it.
    ///
    /// Returns the ids that were backfilled, in registry order.
    pub fn apply(&self, definitions: &mut [ToolDefinition]) -> Vec<String> {
        let mut filled = Vec::new();
        for def in definitions.iter_mut().filter(|d| !d.has_types()) {
            if let Some(rule) = self.rule_for(&def.id) {
                def.types = Some(rule.types.iter().cloned().collect::<TargetTypes>());
                filled.push(def.id.clone());
            }
        }
        filled
    }
}

impl Default for BackfillPolicy {
    fn default() -> Self {
        Self::new(Self::default_rules())
    }
}
