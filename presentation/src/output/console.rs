//! Console output for both binaries
//!
//! The normalizer prints one human line; the parser adapter prints one JSON
//! record. Neither writes anything else to stdout.

use colored::Colorize;
use panel_application::{NormalizeError, NormalizeRegistryOutput, WriteMode};
use panel_domain::InvocationResult;

/// Formats normalizer outcomes and invocation records
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// The single success line for a normalization run
    pub fn format_normalized(output: &NormalizeRegistryOutput, mode: WriteMode) -> String {
        let summary = format!(
            "{}: {} tools, {} duplicates merged, {} backfilled",
            output.location,
            output.tools,
            output.duplicates_merged,
            output.backfilled.len()
        );

        match mode {
            WriteMode::Write if output.written => {
                format!("{} normalized {}", "✓".green().bold(), summary)
            }
            WriteMode::Write => format!("{} already canonical {}", "✓".green().bold(), summary),
            WriteMode::DryRun => {
                let verdict = if output.changed {
                    "would rewrite"
                } else {
                    "already canonical"
                };
                format!("{} {} {}", "○".cyan().bold(), verdict, summary)
            }
            WriteMode::Check if output.changed => {
                format!("{} not canonical {}", "✗".red().bold(), summary)
            }
            WriteMode::Check => format!("{} canonical {}", "✓".green().bold(), summary),
        }
    }

    /// The single error line for a failed normalization run
    pub fn format_error(error: &NormalizeError) -> String {
        let mut line = format!("{} {}", "✗".red().bold(), error);
        if let NormalizeError::Unrepairable {
            artifact: Some(path),
            ..
        } = error
        {
            line.push_str(&format!(" (repair attempt saved to {})", path.display()));
        }
        line
    }

    /// The invocation record, as one JSON line without trailing newline
    pub fn format_record(result: &InvocationResult) -> String {
        result.to_json_line()
    }
}
