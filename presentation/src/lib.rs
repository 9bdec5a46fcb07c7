//! Presentation layer for target-panel
//!
//! This crate contains the CLI definitions of both binaries, the console
//! formatter and logging setup.

pub mod cli;
pub mod logging;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{FixRegistryCli, ParseArgs, ParseCli};
pub use logging::init_logging;
pub use output::console::ConsoleFormatter;
