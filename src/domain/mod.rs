//! Domain layer for fluent-writer.
//!
//! Contains the types shared across all modules:
//! - `Record`: one structured log event
//! - `ForwarderError`: errors surfaced to the caller (construction, close)
//! - `TransportError` / `NormalizationError`: errors recovered inside `write`

pub mod error;
pub mod record;

pub use error::{ForwarderError, NormalizationError, TransportError};
pub use record::{LOG_KEY, Record, unstructured_record};
