//! External parser capabilities
//!
//! An external capability is an executable named after the qualified parser
//! (`jc-parsers-dig` for `jc.parsers.dig`). It is run with `--quiet`, gets
//! the payload on stdin and must print one JSON document on stdout.

use panel_domain::parser::{CapabilityError, ParseOptions, ParserCapability};
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

/// Executable that implements one capability
#[derive(Debug, Clone)]
pub struct ExternalCapability {
    qualified_name: String,
    program: PathBuf,
}

impl ExternalCapability {
    pub fn new(qualified_name: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            program: program.into(),
        }
    }

    fn command(&self, options: ParseOptions) -> Command {
        let mut cmd = Command::new(&self.program);
        if options.quiet {
            cmd.arg("--quiet");
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl ParserCapability for ExternalCapability {
    fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    fn parse(&self, raw: &str, options: ParseOptions) -> Result<Value, CapabilityError> {
        let mut child = self.command(options).spawn().map_err(|e| {
            CapabilityError::parse_failed(format!(
                "failed to start {}: {}",
                self.program.display(),
                e
            ))
        })?;

        // stdin is fed from its own thread while stdout is drained here
        let writer = child.stdin.take().map(|mut stdin| {
            let payload = raw.to_string();
            thread::spawn(move || stdin.write_all(payload.as_bytes()))
        });

        let output = child.wait_with_output().map_err(|e| {
            CapabilityError::parse_failed(format!(
                "failed to wait for {}: {}",
                self.program.display(),
                e
            ))
        })?;

        if let Some(handle) = writer
            && let Ok(Err(e)) = handle.join()
        {
            // The child may legitimately exit without draining stdin
            tracing::debug!(error = %e, "Payload not fully consumed by {}", self.qualified_name);
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            return Err(CapabilityError::parse_failed(if detail.is_empty() {
                format!("{} exited with {}", self.qualified_name, output.status)
            } else {
                detail.to_string()
            }));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| {
            CapabilityError::parse_failed(format!(
                "{} produced invalid JSON: {}",
                self.qualified_name, e
            ))
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[test]
    fn test_stdout_json_is_returned() {
        let dir = TempDir::new().unwrap();
        let program = script(
            &dir,
            "jc-parsers-lines",
            r#"[ "$1" = "--quiet" ] || exit 9
n=$(wc -l | tr -d ' ')
printf '{"lines": %s}' "$n""#,
        );
        let cap = ExternalCapability::new("jc.parsers.lines", program);

        let value = cap.parse("a\nb\nc\n", ParseOptions::default()).unwrap();
        assert_eq!(value["lines"], 3);
    }

    #[test]
    fn test_non_zero_exit_carries_stderr() {
        let dir = TempDir::new().unwrap();
        let program = script(&dir, "jc-parsers-fail", "cat >/dev/null\necho 'bad input' >&2\nexit 1");
        let cap = ExternalCapability::new("jc.parsers.fail", program);

        let err = cap.parse("x", ParseOptions::default()).unwrap_err();
        assert_eq!(err, CapabilityError::parse_failed("bad input"));
    }

    #[test]
    fn test_invalid_json_is_parse_failure() {
        let dir = TempDir::new().unwrap();
        let program = script(&dir, "jc-parsers-text", "cat >/dev/null\necho not-json");
        let cap = ExternalCapability::new("jc.parsers.text", program);

        let err = cap.parse("x", ParseOptions::default()).unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
        assert!(!err.is_resolution_error());
    }

    #[test]
    fn test_missing_program_is_parse_failure() {
        let cap = ExternalCapability::new("jc.parsers.gone", "/nonexistent/jc-parsers-gone");
        let err = cap.parse("x", ParseOptions::default()).unwrap_err();
        assert!(err.to_string().starts_with("failed to start"));
    }
}
