//! Invoke Parser use case
//!
//! Given a parser name and a payload source, resolve the capability, feed it
//! the raw text and fold every outcome into one [`InvocationResult`] plus an
//! [`InvocationStatus`]:
//!
//! | Outcome | Status | Payload read? |
//! |---------|--------|---------------|
//! | parsed | 0 | yes |
//! | no parser name | 2 | no (no I/O at all) |
//! | resolution failed | 3 | no |
//! | capability failed / panicked, payload unreadable | 4 | yes |
//!
//! Nothing escapes this boundary: errors and panics alike become a record.

use crate::ports::capability_resolver::CapabilityResolverPort;
use crate::ports::payload_reader::{PayloadReaderPort, PayloadSource};
use panel_domain::parser::{
    CapabilityError, InvocationResult, InvocationStatus, ParseOptions, ParserCapability,
};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Input for the InvokeParser use case
#[derive(Debug, Clone)]
pub struct InvokeParserInput {
    /// Unqualified parser name; `None` when the caller supplied nothing
    pub parser: Option<String>,
    /// Where to read the payload from
    pub payload: PayloadSource,
}

impl InvokeParserInput {
    pub fn new(parser: Option<String>, payload: PayloadSource) -> Self {
        Self { parser, payload }
    }
}

/// The record to emit and the status to exit with
#[derive(Debug, Clone, PartialEq)]
pub struct InvokeParserOutput {
    pub result: InvocationResult,
    pub status: InvocationStatus,
}

impl InvokeParserOutput {
    fn new(result: InvocationResult, status: InvocationStatus) -> Self {
        Self { result, status }
    }
}

/// Use case for running one parser capability against one payload
pub struct InvokeParserUseCase<C: CapabilityResolverPort, P: PayloadReaderPort> {
    resolver: Arc<C>,
    reader: Arc<P>,
    options: ParseOptions,
}

impl<C: CapabilityResolverPort, P: PayloadReaderPort> InvokeParserUseCase<C, P> {
    pub fn new(resolver: Arc<C>, reader: Arc<P>) -> Self {
        Self {
            resolver,
            reader,
            options: ParseOptions { quiet: true },
        }
    }

    pub fn execute(&self, input: InvokeParserInput) -> InvokeParserOutput {
        let Some(parser) = input.parser else {
            warn!("No parser name supplied");
            return InvokeParserOutput::new(
                InvocationResult::missing_parser(),
                InvocationStatus::MissingParser,
            );
        };

        // ========== Resolve ==========
        let capability = match self.resolver.resolve(&parser) {
            Ok(capability) => capability,
            Err(e) => {
                warn!(parser = %parser, error = %e, "Parser resolution failed");
                return InvokeParserOutput::new(
                    InvocationResult::failure(&parser, format!("parser import failed: {}", e)),
                    InvocationStatus::ResolutionFailed,
                );
            }
        };
        debug!(parser = %parser, capability = capability.qualified_name(), "Resolved parser");

        // ========== Read payload ==========
        let raw = match self.reader.read(&input.payload) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(source = %input.payload, error = %e, "Failed to read payload");
                return InvokeParserOutput::new(
                    InvocationResult::failure(
                        &parser,
                        format!("failed to read payload {}: {}", input.payload, e),
                    ),
                    InvocationStatus::ParseFailed,
                );
            }
        };
        debug!(bytes = raw.len(), source = %input.payload, "Read payload");

        // ========== Invoke ==========
        match invoke_guarded(capability.as_ref(), &raw, self.options) {
            Ok(data) => {
                info!(parser = %parser, "Parse succeeded");
                InvokeParserOutput::new(
                    InvocationResult::success(&parser, data),
                    InvocationStatus::Success,
                )
            }
            Err(e) => {
                warn!(parser = %parser, error = %e, "Parse failed");
                InvokeParserOutput::new(
                    InvocationResult::failure(&parser, e.to_string()),
                    InvocationStatus::ParseFailed,
                )
            }
        }
    }
}

/// Call the capability, converting a panic into a parse failure
fn invoke_guarded(
    capability: &dyn ParserCapability,
    raw: &str,
    options: ParseOptions,
) -> Result<serde_json::Value, CapabilityError> {
    match catch_unwind(AssertUnwindSafe(|| capability.parse(raw, options))) {
        Ok(result) => result,
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(CapabilityError::parse_failed(format!(
                "parser panicked: {}",
                message
            )))
        }
    }
}
