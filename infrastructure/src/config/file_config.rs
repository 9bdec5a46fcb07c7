//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use panel_domain::{BackfillPolicy, BackfillRule};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("registry.path cannot be empty")]
    EmptyRegistryPath,

    #[error("parser.namespace cannot be empty")]
    EmptyNamespace,

    #[error("parser.source_dir_env cannot be empty")]
    EmptySourceDirEnv,

    #[error("repair.tail_fields entries cannot be empty")]
    EmptyTailField,

    #[error("backfill rule for '{0}' has no types")]
    EmptyBackfillTypes(String),
}

/// Raw registry configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRegistryConfig {
    /// Canonical registry file
    pub path: PathBuf,
    /// Suffix appended to the file stem for the failed-repair artifact
    pub attempt_suffix: String,
    /// Default `types` restored for known ids.
    ///
    /// An explicit list replaces the built-in defaults entirely.
    pub backfill: Vec<BackfillRule>,
}

impl Default for FileRegistryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("config/tools.json"),
            attempt_suffix: "_fixed_attempt".to_string(),
            backfill: BackfillPolicy::default_rules(),
        }
    }
}

impl FileRegistryConfig {
    pub fn backfill_policy(&self) -> BackfillPolicy {
        BackfillPolicy::new(self.backfill.clone())
    }
}

/// Raw structural repair configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRepairConfig {
    /// Insert missing `}, {` after an array that runs into an `"id"` field
    pub boundary_insertion: bool,
    /// Fields that legitimately end an object; orphaned fields after them are excised
    pub tail_fields: Vec<String>,
}

impl Default for FileRepairConfig {
    fn default() -> Self {
        Self {
            boundary_insertion: true,
            tail_fields: vec!["parser".to_string()],
        }
    }
}

/// Raw parser adapter configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileParserConfig {
    /// Prefix joined with every parser name (`<namespace>.<name>`)
    pub namespace: String,
    /// Environment variable whose value is prepended to the search path
    pub source_dir_env: String,
    /// Extra directories searched for external capabilities, before `$PATH`
    pub search_paths: Vec<PathBuf>,
    /// Whether the builtin parsers are registered
    pub builtins: bool,
}

impl Default for FileParserConfig {
    fn default() -> Self {
        Self {
            namespace: "jc.parsers".to_string(),
            source_dir_env: "JC_SOURCE_DIR".to_string(),
            search_paths: Vec::new(),
            builtins: true,
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Registry normalizer settings
    pub registry: FileRegistryConfig,
    /// Structural repair settings
    pub repair: FileRepairConfig,
    /// Parser adapter settings
    pub parser: FileParserConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.registry.path.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyRegistryPath);
        }

        if self.parser.namespace.trim().is_empty() {
            return Err(ConfigValidationError::EmptyNamespace);
        }

        if self.parser.source_dir_env.trim().is_empty() {
            return Err(ConfigValidationError::EmptySourceDirEnv);
        }

        if self.repair.tail_fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyTailField);
        }

        if let Some(rule) = self.registry.backfill.iter().find(|r| r.types.is_empty()) {
            return Err(ConfigValidationError::EmptyBackfillTypes(rule.id.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[registry]
path = "local/hyper-target-panel/config/tools.json"
attempt_suffix = ".broken"

[[registry.backfill]]
id = "whatweb"
types = ["url"]

[repair]
boundary_insertion = false
tail_fields = ["parser", "category"]

[parser]
namespace = "acme.parsers"
source_dir_env = "ACME_PARSERS"
search_paths = ["/opt/parsers"]
builtins = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.registry.path,
            PathBuf::from("local/hyper-target-panel/config/tools.json")
        );
        assert_eq!(config.registry.attempt_suffix, ".broken");
        assert_eq!(config.registry.backfill, vec![BackfillRule::new("whatweb", ["url"])]);
        assert!(!config.repair.boundary_insertion);
        assert_eq!(config.repair.tail_fields.len(), 2);
        assert_eq!(config.parser.namespace, "acme.parsers");
        assert_eq!(config.parser.search_paths, vec![PathBuf::from("/opt/parsers")]);
        assert!(!config.parser.builtins);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[parser]
namespace = "acme.parsers"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.parser.namespace, "acme.parsers");
        // Defaults should apply
        assert_eq!(config.parser.source_dir_env, "JC_SOURCE_DIR");
        assert!(config.parser.builtins);
        assert_eq!(config.registry.path, PathBuf::from("config/tools.json"));
        assert_eq!(config.registry.backfill.len(), 2);
        assert!(config.repair.boundary_insertion);
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.parser.namespace, "jc.parsers");
        assert_eq!(config.repair.tail_fields, vec!["parser".to_string()]);
        assert_eq!(config.registry.backfill_policy(), BackfillPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_namespace() {
        let toml_str = r#"
[parser]
namespace = "  "
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::EmptyNamespace)
        ));
    }

    #[test]
    fn test_validate_empty_tail_field() {
        let toml_str = r#"
[repair]
tail_fields = ["parser", ""]
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::EmptyTailField)
        ));
    }

    #[test]
    fn test_validate_backfill_without_types() {
        let toml_str = r#"
[[registry.backfill]]
id = "nikto"
types = []
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        match config.validate() {
            Err(ConfigValidationError::EmptyBackfillTypes(id)) => assert_eq!(id, "nikto"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
