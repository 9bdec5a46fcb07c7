//! Configuration file loading for target-panel
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PANEL_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./panel.toml` or `./.panel.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/target-panel/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileParserConfig, FileRegistryConfig, FileRepairConfig,
};
pub use loader::ConfigLoader;
