//! Payload Reader port
//!
//! The raw text handed to a parser comes either from a file or from the
//! caller's standard input.

use std::path::PathBuf;

/// Where the payload comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    /// Read the whole file
    File(PathBuf),
    /// Read standard input until end of input
    Stdin,
}

impl PayloadSource {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) => PayloadSource::File(p),
            None => PayloadSource::Stdin,
        }
    }
}

impl std::fmt::Display for PayloadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadSource::File(path) => write!(f, "{}", path.display()),
            PayloadSource::Stdin => write!(f, "<stdin>"),
        }
    }
}

/// Port for reading invocation payloads
///
/// Invalid UTF-8 is replaced, never rejected.
pub trait PayloadReaderPort {
    fn read(&self, source: &PayloadSource) -> std::io::Result<String>;
}
