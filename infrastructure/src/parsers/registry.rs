//! Capability registry
//!
//! Resolves an unqualified parser name to a capability. Lookup order:
//!
//! 1. the source-directory override (`$JC_SOURCE_DIR` by default)
//! 2. builtin parsers
//! 3. configured `search_paths`, then `$PATH`
//!
//! Directories are searched for an executable named after the qualified
//! name with dots turned into dashes (`jc.parsers.dig` → `jc-parsers-dig`).

use panel_application::ports::capability_resolver::CapabilityResolverPort;
use panel_domain::parser::{CapabilityError, ParserCapability, qualify, validate_name};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, trace};

use super::builtin::builtin_parsers;
use super::external::ExternalCapability;
use crate::config::FileParserConfig;

/// Name-addressed set of parser capabilities
pub struct CapabilityRegistry {
    namespace: String,
    builtins: HashMap<String, Arc<dyn ParserCapability>>,
    override_dir: Option<PathBuf>,
    search_paths: Vec<PathBuf>,
    include_system_path: bool,
}

impl CapabilityRegistry {
    /// Empty registry: no builtins, no directories
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            builtins: HashMap::new(),
            override_dir: None,
            search_paths: Vec::new(),
            include_system_path: false,
        }
    }

    /// Build from configuration, reading the override directory from the
    /// configured environment variable
    pub fn from_config(config: &FileParserConfig) -> Self {
        let override_dir = std::env::var_os(&config.source_dir_env)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::from_config_with_source_dir(config, override_dir)
    }

    pub fn from_config_with_source_dir(
        config: &FileParserConfig,
        override_dir: Option<PathBuf>,
    ) -> Self {
        let mut registry = Self::new(&config.namespace)
            .with_search_paths(config.search_paths.clone())
            .with_system_path(true);
        if config.builtins {
            registry = registry.with_builtins();
        }
        if let Some(dir) = override_dir {
            debug!(dir = %dir.display(), "Parser source directory override");
            registry = registry.with_override_dir(dir);
        }
        registry
    }

    pub fn with_builtins(mut self) -> Self {
        self.builtins.extend(builtin_parsers(&self.namespace));
        self
    }

    pub fn with_override_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.override_dir = Some(dir.into());
        self
    }

    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = paths;
        self
    }

    /// Whether `$PATH` is searched after the configured directories
    pub fn with_system_path(mut self, include: bool) -> Self {
        self.include_system_path = include;
        self
    }

    /// Executable file name an external capability for `name` must have
    pub fn executable_name(&self, name: &str) -> String {
        qualify(&self.namespace, name).replace('.', "-")
    }

    /// Builtin names, sorted
    pub fn builtin_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builtins.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn find_executable(
        &self,
        qualified: &str,
        executable: &str,
        dirs: &[PathBuf],
    ) -> Result<Option<PathBuf>, CapabilityError> {
        if dirs.is_empty() {
            return Ok(None);
        }
        let paths = std::env::join_paths(dirs).map_err(|e| CapabilityError::LoadFailed {
            name: qualified.to_string(),
            reason: e.to_string(),
        })?;
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        match which::which_in(executable, Some(paths), cwd) {
            Ok(path) => Ok(Some(path)),
            Err(which::Error::CannotFindBinaryPath) => Ok(None),
            Err(e) => Err(CapabilityError::LoadFailed {
                name: qualified.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn general_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = self.search_paths.clone();
        if self.include_system_path
            && let Some(path) = std::env::var_os("PATH")
        {
            dirs.extend(std::env::split_paths(&path));
        }
        dirs
    }

    fn external(&self, qualified: &str, program: PathBuf) -> Arc<dyn ParserCapability> {
        debug!(capability = qualified, program = %program.display(), "Using external parser");
        Arc::new(ExternalCapability::new(qualified, program))
    }
}

impl CapabilityResolverPort for CapabilityRegistry {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn resolve(&self, name: &str) -> Result<Arc<dyn ParserCapability>, CapabilityError> {
        validate_name(name)?;
        let qualified = qualify(&self.namespace, name);
        let executable = self.executable_name(name);
        trace!(capability = %qualified, executable = %executable, "Resolving parser");

        if let Some(dir) = &self.override_dir
            && let Some(program) =
                self.find_executable(&qualified, &executable, std::slice::from_ref(dir))?
        {
            return Ok(self.external(&qualified, program));
        }

        if let Some(builtin) = self.builtins.get(name) {
            debug!(capability = %qualified, "Using builtin parser");
            return Ok(Arc::clone(builtin));
        }

        match self.find_executable(&qualified, &executable, &self.general_dirs())? {
            Some(program) => Ok(self.external(&qualified, program)),
            None => Err(CapabilityError::NotFound(qualified)),
        }
    }
}

/// Separator-joined search list, as it would appear in `$PATH`
pub fn describe_search_path(registry: &CapabilityRegistry) -> OsString {
    let mut dirs: Vec<PathBuf> = registry.override_dir.iter().cloned().collect();
    dirs.extend(registry.general_dirs());
    std::env::join_paths(dirs).unwrap_or_default()
}
