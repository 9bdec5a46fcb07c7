//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order
const PROJECT_CONFIG_FILES: [&str; 2] = ["panel.toml", ".panel.toml"];

/// Prefix of environment overrides (`PANEL_PARSER__NAMESPACE=...`)
const ENV_PREFIX: &str = "PANEL_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `PANEL_<SECTION>__<KEY>`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./panel.toml` or `./.panel.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/target-panel/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// Build the merged figment without extracting it
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/target-panel/config.toml if set,
    /// otherwise falls back to ~/.config/target-panel/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("target-panel").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used (for --show-config)
    pub fn describe_sources(config_path: Option<&Path>) -> String {
        let mut out = String::from("Configuration sources (in priority order):\n");

        out.push_str(&format!("  [ENV  ] {}<SECTION>__<KEY>\n", ENV_PREFIX));

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISS " };
            out.push_str(&format!("  [{}] Explicit: {}\n", mark, path.display()));
        }

        match Self::project_config_path() {
            Some(path) => out.push_str(&format!("  [FOUND] Project: {}\n", path.display())),
            None => out.push_str("  [     ] Project: ./panel.toml or ./.panel.toml\n"),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            out.push_str(&format!("  [{}] Global:  {}\n", mark, path.display()));
        }

        out.push_str("  [     ] Default: built-in defaults\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.parser.namespace, "jc.parsers");
        assert!(config.repair.boundary_insertion);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("target-panel"));
    }

    #[test]
    fn test_project_file_and_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "panel.toml",
                r#"
                [registry]
                path = "data/tools.json"

                [parser]
                namespace = "acme.parsers"
                "#,
            )?;
            jail.set_env("PANEL_PARSER__SOURCE_DIR_ENV", "ACME_SRC");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.registry.path, PathBuf::from("data/tools.json"));
            assert_eq!(config.parser.namespace, "acme.parsers");
            assert_eq!(config.parser.source_dir_env, "ACME_SRC");
            assert_eq!(config.registry.attempt_suffix, "_fixed_attempt");
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_beats_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file("panel.toml", "[parser]\nnamespace = \"project\"\n")?;
            jail.create_file("custom.toml", "[parser]\nnamespace = \"explicit\"\n")?;

            let config = ConfigLoader::load(Some(Path::new("custom.toml"))).map_err(|e| *e)?;
            assert_eq!(config.parser.namespace, "explicit");
            Ok(())
        });
    }

    #[test]
    fn test_describe_sources_mentions_env_prefix() {
        let text = ConfigLoader::describe_sources(None);
        assert!(text.contains("PANEL_"));
        assert!(text.contains("Default"));
    }
}
