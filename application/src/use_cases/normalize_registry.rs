//! Normalize Registry use case
//!
//! Turns a possibly malformed registry document into its canonical form:
//!
//! 1. **Repair** - apply structural rewrite rules to the raw text
//! 2. **Decode** - parse into [`ToolDefinition`]s; failure here is fatal and
//!    the repaired text is kept aside as a diagnostic artifact
//! 3. **Merge** - one definition per id, `types` unioned
//! 4. **Backfill** - restore `types` for ids the repair is known to strip
//! 5. **Write** - overwrite the canonical store (unless dry-run / check)
//!
//! Running it on an already-canonical registry changes nothing.

use crate::ports::document_repair::{AppliedRepair, DocumentRepairPort};
use crate::ports::registry_store::{RegistryStorePort, StoreError};
use panel_domain::{BackfillPolicy, ToolDefinition, merge_duplicates};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort a normalization run
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// Reading, rendering or writing the store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The document did not parse even after repair.
    ///
    /// `artifact` holds the repaired text when it could be written.
    #[error("registry is still malformed after repair: {reason}")]
    Unrepairable {
        reason: String,
        artifact: Option<PathBuf>,
    },
}

/// What to do with the canonical form once it is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Overwrite the canonical store
    #[default]
    Write,
    /// Compute and report, write nothing (not even a failure artifact)
    DryRun,
    /// Like `DryRun`; the caller treats `changed` as a failure
    Check,
}

impl WriteMode {
    pub fn writes(&self) -> bool {
        matches!(self, WriteMode::Write)
    }
}

/// Input for the NormalizeRegistry use case
#[derive(Debug, Clone, Default)]
pub struct NormalizeRegistryInput {
    pub mode: WriteMode,
}

impl NormalizeRegistryInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Summary of a successful run
#[derive(Debug, Clone)]
pub struct NormalizeRegistryOutput {
    /// Location of the canonical store
    pub location: String,
    /// Number of surviving definitions
    pub tools: usize,
    /// Number of duplicate entries folded away
    pub duplicates_merged: usize,
    /// Ids that received default `types`
    pub backfilled: Vec<String>,
    /// Repair rules that fired
    pub repairs: Vec<AppliedRepair>,
    /// Whether the canonical text differs from what was read
    pub changed: bool,
    /// Whether the canonical store was overwritten
    pub written: bool,
}

/// Use case for repairing, merging and rewriting the tool registry
pub struct NormalizeRegistryUseCase<S: RegistryStorePort, R: DocumentRepairPort> {
    store: Arc<S>,
    repairer: Arc<R>,
    backfill: BackfillPolicy,
}

impl<S: RegistryStorePort, R: DocumentRepairPort> NormalizeRegistryUseCase<S, R> {
    pub fn new(store: Arc<S>, repairer: Arc<R>) -> Self {
        Self {
            store,
            repairer,
            backfill: BackfillPolicy::default(),
        }
    }

    pub fn with_backfill(mut self, backfill: BackfillPolicy) -> Self {
        self.backfill = backfill;
        self
    }

    pub fn execute(
        &self,
        input: NormalizeRegistryInput,
    ) -> Result<NormalizeRegistryOutput, NormalizeError> {
        let location = self.store.location();
        info!("Normalizing registry {}", location);

        let raw = self.store.read_raw()?;

        // ========== Repair ==========
        let report = self.repairer.repair(&raw);
        for applied in &report.applied {
            warn!(rule = %applied.rule, count = applied.count, "Applied structural repair");
        }
        for fragment in &report.excised {
            warn!("Excised orphaned fragment: {}", fragment.trim());
        }

        // ========== Decode ==========
        let tools: Vec<ToolDefinition> = match serde_json::from_str(&report.text) {
            Ok(tools) => tools,
            Err(e) => {
                let reason = e.to_string();
                warn!("Registry does not parse after repair: {}", reason);
                let artifact = if input.mode.writes() {
                    match self.store.write_attempt(&report.text) {
                        Ok(path) => {
                            info!("Saved repair attempt to {}", path.display());
                            Some(path)
                        }
                        Err(e) => {
                            warn!("Could not save repair attempt: {}", e);
                            None
                        }
                    }
                } else {
                    None
                };
                return Err(NormalizeError::Unrepairable { reason, artifact });
            }
        };
        let decoded = tools.len();

        // ========== Merge ==========
        let merge = merge_duplicates(tools);
        for dup in &merge.merged {
            debug!(
                id = %dup.id,
                input_index = dup.input_index,
                contributed_types = dup.contributed_types,
                "Merged duplicate definition"
            );
        }
        let duplicates_merged = merge.duplicates_merged();
        let mut definitions = merge.definitions;

        // ========== Backfill ==========
        let backfilled = self.backfill.apply(&mut definitions);
        for id in &backfilled {
            debug!(id = %id, "Backfilled default types");
        }

        // ========== Write ==========
        let rendered = self.store.render(&definitions)?;
        let changed = rendered != raw;
        let written = input.mode.writes() && changed;
        if written {
            self.store.write_canonical(&rendered)?;
        }

        info!(
            decoded,
            tools = definitions.len(),
            duplicates_merged,
            changed,
            written,
            "Registry normalized"
        );

        Ok(NormalizeRegistryOutput {
            location,
            tools: definitions.len(),
            duplicates_merged,
            backfilled,
            repairs: report.applied,
            changed,
            written,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::document_repair::RepairReport;
    use panel_domain::BackfillRule;
    use std::cell::RefCell;

    struct MemoryStore {
        raw: String,
        canonical: RefCell<Option<String>>,
        attempt: RefCell<Option<String>>,
        attempt_fails: bool,
    }

    impl MemoryStore {
        fn new(raw: &str) -> Self {
            Self {
                raw: raw.to_string(),
                canonical: RefCell::new(None),
                attempt: RefCell::new(None),
                attempt_fails: false,
            }
        }

        fn with_failing_attempt(mut self) -> Self {
            self.attempt_fails = true;
            self
        }
    }

    impl RegistryStorePort for MemoryStore {
        fn location(&self) -> String {
            "memory://tools.json".to_string()
        }

        fn read_raw(&self) -> Result<String, StoreError> {
            Ok(self.raw.clone())
        }

        fn render(&self, definitions: &[ToolDefinition]) -> Result<String, StoreError> {
            serde_json::to_string_pretty(definitions)
                .map(|s| s + "\n")
                .map_err(|e| StoreError::Encode(e.to_string()))
        }

        fn write_canonical(&self, rendered: &str) -> Result<(), StoreError> {
            *self.canonical.borrow_mut() = Some(rendered.to_string());
            Ok(())
        }

        fn write_attempt(&self, text: &str) -> Result<PathBuf, StoreError> {
            if self.attempt_fails {
                return Err(StoreError::Write {
                    path: PathBuf::from("tools_fixed_attempt.json"),
                    source: std::io::Error::other("disk full"),
                });
            }
            *self.attempt.borrow_mut() = Some(text.to_string());
            Ok(PathBuf::from("tools_fixed_attempt.json"))
        }
    }

    /// Repairer that only records it was consulted
    struct NoRepair;

    impl DocumentRepairPort for NoRepair {
        fn repair(&self, raw: &str) -> RepairReport {
            RepairReport::untouched(raw)
        }
    }

    /// Repairer that swaps one fixed string, standing in for the regex rules
    struct ReplaceRepair(&'static str, &'static str);

    impl DocumentRepairPort for ReplaceRepair {
        fn repair(&self, raw: &str) -> RepairReport {
            if !raw.contains(self.0) {
                return RepairReport::untouched(raw);
            }
            RepairReport {
                text: raw.replace(self.0, self.1),
                applied: vec![AppliedRepair {
                    rule: "test".to_string(),
                    count: 1,
                }],
                excised: Vec::new(),
            }
        }
    }

    fn use_case<R: DocumentRepairPort>(
        store: &Arc<MemoryStore>,
        repairer: R,
    ) -> NormalizeRegistryUseCase<MemoryStore, R> {
        NormalizeRegistryUseCase::new(store.clone(), Arc::new(repairer))
    }

    #[test]
    fn test_duplicates_merged_and_written() {
        let raw = r#"[
          {"id": "nuclei", "types": ["url"]},
          {"id": "nmap-quick"},
          {"id": "nuclei", "types": ["domain"], "command": "ignored"}
        ]"#;
        let store = Arc::new(MemoryStore::new(raw));
        let output = use_case(&store, NoRepair)
            .execute(NormalizeRegistryInput::new())
            .unwrap();

        assert_eq!(output.tools, 2);
        assert_eq!(output.duplicates_merged, 1);
        assert!(output.written);

        let written = store.canonical.borrow().clone().unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value[0]["id"], "nuclei");
        assert_eq!(value[0]["types"], serde_json::json!(["url", "domain"]));
        assert!(value[0].get("command").is_none());
        assert_eq!(value[1]["id"], "nmap-quick");
    }

    #[test]
    fn test_second_run_is_noop() {
        let raw = r#"[{"id": "a", "types": ["url"]}, {"id": "a", "types": ["ip"]}, {"id": "whatweb"}]"#;
        let store = Arc::new(MemoryStore::new(raw));
        use_case(&store, NoRepair)
            .execute(NormalizeRegistryInput::new())
            .unwrap();
        let first = store.canonical.borrow().clone().unwrap();

        let store2 = Arc::new(MemoryStore::new(&first));
        let output = use_case(&store2, NoRepair)
            .execute(NormalizeRegistryInput::new())
            .unwrap();

        assert!(!output.changed);
        assert!(!output.written);
        assert_eq!(output.duplicates_merged, 0);
        assert!(output.backfilled.is_empty());
        assert!(store2.canonical.borrow().is_none());
    }

    #[test]
    fn test_backfill_applied_after_merge() {
        let raw = r#"[{"id": "whatweb"}, {"id": "nmap-quick"}]"#;
        let store = Arc::new(MemoryStore::new(raw));
        let output = use_case(&store, NoRepair)
            .execute(NormalizeRegistryInput::new())
            .unwrap();
        assert_eq!(output.backfilled, vec!["whatweb"]);

        let custom = Arc::new(MemoryStore::new(raw));
        let output = use_case(&custom, NoRepair)
            .with_backfill(BackfillPolicy::new(vec![BackfillRule::new("nmap-quick", ["ip"])]))
            .execute(NormalizeRegistryInput::new())
            .unwrap();
        assert_eq!(output.backfilled, vec!["nmap-quick"]);
    }

    #[test]
    fn test_null_types_is_backfilled_like_missing() {
        let raw = r#"[{"id": "nikto", "types": null}, {"id": "nmap-quick", "types": null}]"#;
        let store = Arc::new(MemoryStore::new(raw));
        let output = use_case(&store, NoRepair)
            .execute(NormalizeRegistryInput::new())
            .unwrap();
        assert_eq!(output.backfilled, vec!["nikto"]);

        let written = store.canonical.borrow().clone().unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value[0]["types"], serde_json::json!(["url", "domain"]));
        assert!(value[1].get("types").is_none());
    }

    #[test]
    fn test_repair_runs_before_decode() {
        let raw = r#"[{"id": "a"} {"id": "b"}]"#;
        let store = Arc::new(MemoryStore::new(raw));
        let output = use_case(&store, ReplaceRepair("} {", "}, {"))
            .execute(NormalizeRegistryInput::new())
            .unwrap();

        assert_eq!(output.tools, 2);
        assert_eq!(output.repairs.len(), 1);
    }

    #[test]
    fn test_unrepairable_saves_attempt_and_keeps_store() {
        let raw = r#"[{"id": "a"} {"id": "b"}]"#;
        let store = Arc::new(MemoryStore::new(raw));
        let err = use_case(&store, ReplaceRepair("[", "[ "))
            .execute(NormalizeRegistryInput::new())
            .unwrap_err();

        match err {
            NormalizeError::Unrepairable { artifact, .. } => {
                assert_eq!(artifact, Some(PathBuf::from("tools_fixed_attempt.json")));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            store.attempt.borrow().as_deref(),
            Some(r#"[ {"id": "a"} {"id": "b"}]"#)
        );
        assert!(store.canonical.borrow().is_none());
    }

    #[test]
    fn test_unsaved_attempt_still_reports_decode_reason() {
        let store = Arc::new(MemoryStore::new("[{").with_failing_attempt());
        let err = use_case(&store, NoRepair)
            .execute(NormalizeRegistryInput::new())
            .unwrap_err();

        match &err {
            NormalizeError::Unrepairable { reason, artifact } => {
                assert!(reason.contains("EOF"), "{reason}");
                assert!(artifact.is_none());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with("registry is still malformed after repair"));
        assert!(store.canonical.borrow().is_none());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let store = Arc::new(MemoryStore::new(r#"[{"id": "a"}, {"id": "a"}]"#));
        let output = use_case(&store, NoRepair)
            .execute(NormalizeRegistryInput::new().with_mode(WriteMode::DryRun))
            .unwrap();
        assert!(output.changed);
        assert!(!output.written);
        assert!(store.canonical.borrow().is_none());

        let broken = Arc::new(MemoryStore::new("[{"));
        let err = use_case(&broken, NoRepair)
            .execute(NormalizeRegistryInput::new().with_mode(WriteMode::Check))
            .unwrap_err();
        assert!(matches!(err, NormalizeError::Unrepairable { artifact: None, .. }));
        assert!(broken.attempt.borrow().is_none());
    }

    #[test]
    fn test_entry_without_id_is_unrepairable() {
        let store = Arc::new(MemoryStore::new(r#"[{"command": "whatweb {target}"}]"#));
        let err = use_case(&store, NoRepair)
            .execute(NormalizeRegistryInput::new())
            .unwrap_err();
        assert!(err.to_string().contains("missing field `id`"));
    }
}
