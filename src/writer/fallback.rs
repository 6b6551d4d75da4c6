use crate::domain::Record;
use std::io::Write;

/// Where a record goes when the transport refuses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackSink {
    #[default]
    Stdout,
    Stderr,
    Discard,
}

impl FallbackSink {
    /// Best effort: errors writing the fallback line are ignored.
    pub fn emit(self, record: &Record) {
        let line = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(_) => format!("{record:?}"),
        };
        let _ = match self {
            FallbackSink::Stdout => writeln!(std::io::stdout().lock(), "Failed to send: {line}"),
            FallbackSink::Stderr => writeln!(std::io::stderr().lock(), "Failed to send: {line}"),
            FallbackSink::Discard => Ok(()),
        };
    }
}
