//! CLI entrypoint for the registry normalizer
//!
//! Wires the file store and structural repairer into the normalize use case.
//! Exit status: 0 on success, 1 on failure or (with `--check`) drift.

use anyhow::{Result, anyhow};
use clap::Parser;
use panel_application::{NormalizeRegistryInput, NormalizeRegistryUseCase, WriteMode};
use panel_infrastructure::{ConfigLoader, FileConfig, FileRegistryStore, StructuralRepairer};
use panel_presentation::{ConsoleFormatter, FixRegistryCli, init_logging};
use std::sync::Arc;
use tracing::{debug, info};

fn main() -> Result<()> {
    let cli = FixRegistryCli::parse();
    init_logging(cli.verbose);

    if cli.show_config {
        print!("{}", ConfigLoader::describe_sources(cli.config.as_deref()));
        return Ok(());
    }

    let config = load_config(&cli)?;
    let path = cli.path.clone().unwrap_or_else(|| config.registry.path.clone());
    info!("Starting registry normalizer");
    debug!(registry = %path.display(), "Resolved registry path");

    // === Dependency Injection ===
    let store = Arc::new(
        FileRegistryStore::new(path).with_attempt_suffix(&config.registry.attempt_suffix),
    );
    let repairer = Arc::new(
        StructuralRepairer::from_config(&config.repair)
            .map_err(|e| anyhow!("invalid repair rule: {}", e))?,
    );
    debug!(rules = ?repairer.rule_names(), "Repair rules");

    let use_case = NormalizeRegistryUseCase::new(store, repairer)
        .with_backfill(config.registry.backfill_policy());

    let mode = cli.write_mode();
    let code = match use_case.execute(NormalizeRegistryInput::new().with_mode(mode)) {
        Ok(output) => {
            println!("{}", ConsoleFormatter::format_normalized(&output, mode));
            if mode == WriteMode::Check && output.changed {
                1
            } else {
                0
            }
        }
        Err(e) => {
            eprintln!("{}", ConsoleFormatter::format_error(&e));
            1
        }
    };

    std::process::exit(code)
}

fn load_config(cli: &FixRegistryCli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };
    config.validate()?;
    Ok(config)
}
