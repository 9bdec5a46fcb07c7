//! CLI entrypoint for the parser invocation adapter
//!
//! Always prints exactly one JSON record on stdout and exits with the
//! invocation status (0, 2, 3 or 4). Logs go to stderr.

use panel_application::{InvokeParserInput, InvokeParserUseCase};
use panel_domain::{InvocationResult, InvocationStatus};
use panel_infrastructure::{CapabilityRegistry, ConfigLoader, FileConfig, StdPayloadReader};
use panel_presentation::{ConsoleFormatter, ParseArgs, ParseCli, init_logging};
use std::sync::Arc;
use tracing::{debug, warn};

fn main() {
    let cli = match ParseCli::parse_args(std::env::args_os()) {
        ParseArgs::Run(cli) => cli,
        ParseArgs::Informational(e) => e.exit(),
        ParseArgs::Usage(message) => emit(
            InvocationResult::usage_error(message),
            InvocationStatus::MissingParser,
        ),
    };

    // No parser name: report it before touching config, env or the payload
    let parser = match cli.require_parser() {
        Ok(parser) => parser,
        Err(record) => emit(record, InvocationStatus::MissingParser),
    };
    init_logging(cli.verbose);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(reason) => {
            warn!("{}", reason);
            emit(
                InvocationResult::failure(&parser, format!("parser import failed: {}", reason)),
                InvocationStatus::ResolutionFailed,
            )
        }
    };

    // === Dependency Injection ===
    let registry = CapabilityRegistry::from_config(&config.parser);
    debug!(
        namespace = %config.parser.namespace,
        builtins = ?registry.builtin_names(),
        search_path = ?panel_infrastructure::describe_search_path(&registry),
        "Capability registry ready"
    );
    let use_case = InvokeParserUseCase::new(Arc::new(registry), Arc::new(StdPayloadReader::new()));

    let payload = cli.payload_source();
    let output = use_case.execute(InvokeParserInput::new(Some(parser), payload));
    emit(output.result, output.status)
}

fn load_config(cli: &ParseCli) -> Result<FileConfig, String> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| format!("invalid configuration: {}", e))?
    };
    config
        .validate()
        .map_err(|e| format!("invalid configuration: {}", e))?;
    Ok(config)
}

fn emit(result: InvocationResult, status: InvocationStatus) -> ! {
    println!("{}", ConsoleFormatter::format_record(&result));
    std::process::exit(status.code())
}
