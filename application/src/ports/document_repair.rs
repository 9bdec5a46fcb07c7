//! Document Repair port
//!
//! Structural repair runs on raw text, strictly before the document is
//! decoded. Implementations apply a small ordered set of rewrite rules and
//! report what they changed.

/// Substitutions made by one rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedRepair {
    /// Rule name (e.g. "boundary-insertion")
    pub rule: String,
    /// Number of substitutions
    pub count: usize,
}

/// Output of a repair pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Repaired text (equal to the input when nothing matched)
    pub text: String,
    /// Rules that matched at least once, in application order
    pub applied: Vec<AppliedRepair>,
    /// Raw text removed by excision rules
    pub excised: Vec<String>,
}

impl RepairReport {
    /// Report for text that no rule touched
    pub fn untouched(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            applied: Vec::new(),
            excised: Vec::new(),
        }
    }

    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }

    pub fn total_substitutions(&self) -> usize {
        self.applied.iter().map(|a| a.count).sum()
    }
}

/// Port for pre-parse structural repair
pub trait DocumentRepairPort {
    fn repair(&self, raw: &str) -> RepairReport;
}
