//! CLI command definitions

use clap::Parser;
use clap::error::ErrorKind;
use panel_application::{PayloadSource, WriteMode};
use panel_domain::InvocationResult;
use std::ffi::OsString;
use std::path::PathBuf;

/// CLI arguments for panel-fix-registry
#[derive(Parser, Debug)]
#[command(name = "panel-fix-registry")]
#[command(author, version, about = "Repair, deduplicate and rewrite the tool registry")]
#[command(long_about = r#"
Normalizes the tool registry (config/tools.json by default):

1. Structural repair: fix the known malformations (missing object boundary,
   orphaned fields glued after "parser")
2. Merge: one definition per id, target types unioned
3. Backfill: restore target types for whatweb and nikto
4. Rewrite: 2-space indented JSON, first-seen order

If the document still does not parse after repair, the repaired text is
saved as <stem>_fixed_attempt.<ext> and the registry is left untouched.

Configuration files are loaded from (in priority order):
1. PANEL_* environment variables
2. --config <path>     Explicit config file
3. ./panel.toml        Project-level config
4. ~/.config/target-panel/config.toml   Global config

Example:
  panel-fix-registry
  panel-fix-registry --check config/tools.json
"#)]
pub struct FixRegistryCli {
    /// Registry file (overrides registry.path from config)
    pub path: Option<PathBuf>,

    /// Compute the canonical form and report, but write nothing
    #[arg(long, conflicts_with = "check")]
    pub dry_run: bool,

    /// Exit 1 if the registry is not already canonical; write nothing
    #[arg(long)]
    pub check: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl FixRegistryCli {
    pub fn write_mode(&self) -> WriteMode {
        if self.check {
            WriteMode::Check
        } else if self.dry_run {
            WriteMode::DryRun
        } else {
            WriteMode::Write
        }
    }
}

/// CLI arguments for panel-parse
#[derive(Parser, Debug)]
#[command(name = "panel-parse")]
#[command(author, version, about = "Run a named parser over a payload and print one JSON record")]
#[command(long_about = r#"
Resolves <PARSER> to a parsing capability, feeds it the payload and prints a
single JSON line on stdout:

  {"ok":true,"parser":"kv","data":{...}}
  {"ok":false,"parser":"kv","error":"..."}

Exit status: 0 parsed, 2 missing parser / usage error, 3 parser could not
be resolved (payload not read), 4 parser rejected the payload.

Capabilities are looked up in $JC_SOURCE_DIR, then the builtin parsers
(kv, csv, hosts), then executables named jc-parsers-<PARSER> on the search
path.
"#)]
pub struct ParseCli {
    /// Parser name, without namespace (e.g. "kv", "dig")
    pub parser: Option<String>,

    /// Payload file; standard input when omitted
    pub payload: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,
}

/// Outcome of parsing `panel-parse` arguments
#[derive(Debug)]
pub enum ParseArgs {
    /// Arguments are usable
    Run(ParseCli),
    /// `--help` / `--version`: print and exit normally
    Informational(clap::Error),
    /// Anything else; reported as a status-2 record
    Usage(String),
}

impl ParseCli {
    pub fn parse_args<I, T>(args: I) -> ParseArgs
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Self::try_parse_from(args) {
            Ok(cli) => ParseArgs::Run(cli),
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::DisplayHelp
                        | ErrorKind::DisplayVersion
                        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) =>
            {
                ParseArgs::Informational(e)
            }
            Err(e) => ParseArgs::Usage(first_line(&e.to_string())),
        }
    }

    /// Parser name, or the missing-parser record when none was given.
    ///
    /// Decided from the arguments alone, before any config or payload I/O.
    pub fn require_parser(&self) -> Result<String, InvocationResult> {
        self.parser.clone().ok_or_else(InvocationResult::missing_parser)
    }

    pub fn payload_source(&self) -> PayloadSource {
        PayloadSource::from_path(self.payload.clone())
    }
}

/// First non-empty line of clap's rendered error, without the `error: ` prefix
fn first_line(rendered: &str) -> String {
    let line = rendered
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("invalid arguments");
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_clis_are_well_formed() {
        FixRegistryCli::command().debug_assert();
        ParseCli::command().debug_assert();
    }

    #[test]
    fn test_fix_registry_modes() {
        let cli = FixRegistryCli::try_parse_from(["panel-fix-registry"]).unwrap();
        assert_eq!(cli.write_mode(), WriteMode::Write);
        assert!(cli.path.is_none());

        let cli =
            FixRegistryCli::try_parse_from(["panel-fix-registry", "--dry-run", "tools.json"])
                .unwrap();
        assert_eq!(cli.write_mode(), WriteMode::DryRun);
        assert_eq!(cli.path, Some(PathBuf::from("tools.json")));

        let cli = FixRegistryCli::try_parse_from(["panel-fix-registry", "--check", "-vv"]).unwrap();
        assert_eq!(cli.write_mode(), WriteMode::Check);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_dry_run_conflicts_with_check() {
        assert!(
            FixRegistryCli::try_parse_from(["panel-fix-registry", "--dry-run", "--check"]).is_err()
        );
    }

    #[test]
    fn test_parse_without_arguments_is_runnable() {
        let ParseArgs::Run(cli) = ParseCli::parse_args(["panel-parse"]) else {
            panic!("expected Run");
        };
        assert!(cli.parser.is_none());
        assert_eq!(cli.payload_source(), PayloadSource::Stdin);
    }

    #[test]
    fn test_missing_parser_is_decided_from_arguments() {
        let ParseArgs::Run(cli) = ParseCli::parse_args(["panel-parse", "--config", "absent.toml"])
        else {
            panic!("expected Run");
        };
        let record = cli.require_parser().unwrap_err();
        assert_eq!(record, InvocationResult::missing_parser());
        assert_eq!(record.error(), Some("missing parser arg"));

        let ParseArgs::Run(cli) = ParseCli::parse_args(["panel-parse", "hosts"]) else {
            panic!("expected Run");
        };
        assert_eq!(cli.require_parser().unwrap(), "hosts");
    }

    #[test]
    fn test_parse_with_payload_file() {
        let ParseArgs::Run(cli) = ParseCli::parse_args(["panel-parse", "kv", "out.txt"]) else {
            panic!("expected Run");
        };
        assert_eq!(cli.parser.as_deref(), Some("kv"));
        assert_eq!(
            cli.payload_source(),
            PayloadSource::File(PathBuf::from("out.txt"))
        );
    }

    #[test]
    fn test_unknown_flag_is_usage_error() {
        match ParseCli::parse_args(["panel-parse", "--bogus"]) {
            ParseArgs::Usage(message) => {
                assert!(message.contains("--bogus"));
                assert!(!message.starts_with("error:"));
            }
            other => panic!("expected Usage, got {other:?}"),
        }
    }

    #[test]
    fn test_extra_positional_is_usage_error() {
        assert!(matches!(
            ParseCli::parse_args(["panel-parse", "kv", "a", "b"]),
            ParseArgs::Usage(_)
        ));
    }

    #[test]
    fn test_help_is_informational() {
        assert!(matches!(
            ParseCli::parse_args(["panel-parse", "--help"]),
            ParseArgs::Informational(_)
        ));
    }
}
