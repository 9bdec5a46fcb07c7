//! Structural repair rules
//!
//! Narrow, ordered textual rewrites for the malformation shapes the registry
//! is known to develop. Each rule is a regex substitution that is inert on
//! well-formed JSON, so running the repairer on a healthy document is a no-op.
//!
//! | Rule | Malformation | Rewrite |
//! |------|--------------|---------|
//! | `boundary-insertion` | `] "id": ...` (array runs into the next object) | `] }, { "id": ...` |
//! | `fragment-excision:<field>` | `"<field>": "v" "k": ..., "k2": ... }` (orphan run, no comma) | `"<field>": "v" }` |
//!
//! This is not a general JSON recovery parser.

use panel_application::ports::document_repair::{AppliedRepair, DocumentRepairPort, RepairReport};
use regex::{Captures, Regex};

use crate::config::FileRepairConfig;

/// A JSON string literal, escapes included
const STRING_LITERAL: &str = r#""(?:[^"\\]|\\.)*""#;

/// Result of applying one rule
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOutcome {
    pub text: String,
    pub count: usize,
    pub excised: Vec<String>,
}

/// One pattern-based rewrite
#[derive(Debug, Clone)]
pub struct RegexRepairRule {
    name: String,
    pattern: Regex,
    replacement: String,
    /// Capture group holding text the rule throws away
    excised_group: Option<usize>,
}

impl RegexRepairRule {
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
            excised_group: None,
        })
    }

    fn with_excised_group(mut self, group: usize) -> Self {
        self.excised_group = Some(group);
        self
    }

    /// Close an object whose last array runs straight into the next `"id"` field
    pub fn boundary_insertion() -> Result<Self, regex::Error> {
        Self::new(
            "boundary-insertion",
            r#"(\])(\s*)("id"\s*:)"#,
            "${1}\n  },\n  {${2}${3}",
        )
    }

    /// Drop orphaned fields glued onto `tail_field` and close the object there
    pub fn fragment_excision(tail_field: &str) -> Result<Self, regex::Error> {
        let pattern = format!(
            r#"("{field}"\s*:\s*{s})(\s+{s}\s*:(?:{s}|[^{{}}"])*?)(\s*\}})"#,
            field = regex::escape(tail_field),
            s = STRING_LITERAL,
        );
        Ok(Self::new(format!("fragment-excision:{}", tail_field), &pattern, "${1}${3}")?
            .with_excised_group(2))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, text: &str) -> RuleOutcome {
        let mut count = 0;
        let mut excised = Vec::new();
        let rewritten = self.pattern.replace_all(text, |caps: &Captures| {
            count += 1;
            if let Some(group) = self.excised_group
                && let Some(m) = caps.get(group)
            {
                excised.push(m.as_str().to_string());
            }
            let mut out = String::new();
            caps.expand(&self.replacement, &mut out);
            out
        });
        RuleOutcome {
            text: rewritten.into_owned(),
            count,
            excised,
        }
    }
}

/// Ordered set of repair rules
#[derive(Debug, Clone, Default)]
pub struct StructuralRepairer {
    rules: Vec<RegexRepairRule>,
}

impl StructuralRepairer {
    pub fn new(rules: Vec<RegexRepairRule>) -> Self {
        Self { rules }
    }

    /// Boundary insertion followed by excision after `parser`
    pub fn with_default_rules() -> Result<Self, regex::Error> {
        Self::from_config(&FileRepairConfig::default())
    }

    pub fn from_config(config: &FileRepairConfig) -> Result<Self, regex::Error> {
        let mut rules = Vec::new();
        if config.boundary_insertion {
            rules.push(RegexRepairRule::boundary_insertion()?);
        }
        for field in &config.tail_fields {
            rules.push(RegexRepairRule::fragment_excision(field)?);
        }
        Ok(Self::new(rules))
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }
}

impl DocumentRepairPort for StructuralRepairer {
    fn repair(&self, raw: &str) -> RepairReport {
        let mut report = RepairReport::untouched(raw);
        for rule in &self.rules {
            let outcome = rule.apply(&report.text);
            if outcome.count == 0 {
                continue;
            }
            tracing::debug!(rule = rule.name(), count = outcome.count, "Repair rule matched");
            report.text = outcome.text;
            report.applied.push(AppliedRepair {
                rule: rule.name().to_string(),
                count: outcome.count,
            });
            report.excised.extend(outcome.excised);
        }
        report
    }
}
