//! Payload reader backed by the filesystem and standard input

use panel_application::ports::payload_reader::{PayloadReaderPort, PayloadSource};
use std::io::Read;

/// Reads payloads as lossy UTF-8
#[derive(Debug, Clone, Copy, Default)]
pub struct StdPayloadReader;

impl StdPayloadReader {
    pub fn new() -> Self {
        Self
    }
}

impl PayloadReaderPort for StdPayloadReader {
    fn read(&self, source: &PayloadSource) -> std::io::Result<String> {
        let bytes = match source {
            PayloadSource::File(path) => std::fs::read(path)?,
            PayloadSource::Stdin => {
                let mut buf = Vec::new();
                std::io::stdin().lock().read_to_end(&mut buf)?;
                buf
            }
        };
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
