//! Classification of raw log lines into records.
//!
//! A line is tried as a JSON object first, then handed to the optional
//! [`Normalizer`], and finally wrapped as `{"log": "<line>"}`. The first
//! attempt that yields a record wins.

use crate::domain::{NormalizationError, Record, unstructured_record};

/// User supplied fallback parser for lines that are not JSON objects.
///
/// `Ok(Some(record))` is a success. `Ok(None)` declines the line, which is
/// treated the same as an error: classification moves on to the
/// unstructured fallback.
pub type Normalizer =
    Box<dyn Fn(&[u8]) -> Result<Option<Record>, NormalizationError> + Send + Sync>;

/// Boxes a closure as a [`Normalizer`].
pub fn normalizer<F>(f: F) -> Normalizer
where
    F: Fn(&[u8]) -> Result<Option<Record>, NormalizationError> + Send + Sync + 'static,
{
    Box::new(f)
}

/// Which attempt produced the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsePath {
    Structured,
    Normalized,
    Unstructured,
}

impl ParsePath {
    pub fn as_str(self) -> &'static str {
        match self {
            ParsePath::Structured => "structured",
            ParsePath::Normalized => "normalized",
            ParsePath::Unstructured => "unstructured",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub path: ParsePath,
    pub record: Record,
}

/// Parses `raw` as a JSON object. Arrays, scalars and `null` are rejected.
pub fn parse_structured(raw: &[u8]) -> Option<Record> {
    serde_json::from_slice::<Record>(raw).ok()
}

/// Runs the classification attempts in order and returns the first record.
pub fn classify(raw: &[u8], normalizer: Option<&Normalizer>) -> Classified {
    if let Some(record) = parse_structured(raw) {
        return Classified {
            path: ParsePath::Structured,
            record,
        };
    }

    if let Some(normalize) = normalizer {
        match normalize(raw) {
            Ok(Some(record)) => {
                return Classified {
                    path: ParsePath::Normalized,
                    record,
                };
            }
            Ok(None) => {
                tracing::debug!(target: "fluent_writer", "normalizer declined line");
            }
            Err(e) => {
                tracing::debug!(target: "fluent_writer", error = %e, "normalizer failed");
            }
        }
    }

    Classified {
        path: ParsePath::Unstructured,
        record: unstructured_record(raw),
    }
}
