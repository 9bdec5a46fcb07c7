//! Invocation result envelope and status codes

use serde::Serialize;
use serde_json::Value;

/// Outcome class of one adapter invocation, mapped onto a process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationStatus {
    /// Parse succeeded, `data` populated
    Success,
    /// No parser name was supplied
    MissingParser,
    /// The capability could not be resolved or loaded
    ResolutionFailed,
    /// The capability ran and failed
    ParseFailed,
}

impl InvocationStatus {
    pub fn code(&self) -> i32 {
        match self {
            InvocationStatus::Success => 0,
            InvocationStatus::MissingParser => 2,
            InvocationStatus::ResolutionFailed => 3,
            InvocationStatus::ParseFailed => 4,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InvocationStatus::Success)
    }
}

impl std::fmt::Display for InvocationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            InvocationStatus::Success => "success",
            InvocationStatus::MissingParser => "missing-parser",
            InvocationStatus::ResolutionFailed => "resolution-failed",
            InvocationStatus::ParseFailed => "parse-failed",
        };
        write!(f, "{}", label)
    }
}

/// The single record emitted per invocation.
///
/// Exactly one of `data` / `error` is present; the constructors are the only
/// way to build one, so the type is serialize-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvocationResult {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    parser: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl InvocationResult {
    pub fn success(parser: impl Into<String>, data: Value) -> Self {
        Self {
            ok: true,
            parser: Some(parser.into()),
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(parser: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            ok: false,
            parser: Some(parser.into()),
            data: None,
            error: Some(error.into()),
        }
    }

    /// Record for an invocation that named no parser at all
    pub fn missing_parser() -> Self {
        Self {
            ok: false,
            parser: None,
            data: None,
            error: Some("missing parser arg".to_string()),
        }
    }

    /// Usage error record (same outcome class as a missing parser)
    pub fn usage_error(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            parser: None,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    pub fn parser(&self) -> Option<&str> {
        self.parser.as_deref()
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Render as a single JSON line (non-ASCII left unescaped)
    pub fn to_json_line(&self) -> String {
        match serde_json::to_string(self) {
            Ok(line) => line,
            // Only reachable if `data` holds something serde_json cannot encode
            Err(e) => serde_json::json!({
                "ok": false,
                "parser": self.parser,
                "error": format!("failed to encode result: {}", e),
            })
            .to_string(),
        }
    }
}
