use thiserror::Error;

/// Errors surfaced to callers of the forwarder at construction time.
///
/// Everything that goes wrong inside `write` is absorbed; close failures are
/// returned as the transport's own [`TransportError`].
#[derive(Error, Debug)]
pub enum ForwarderError {
    #[error("Transport initialization failed: {0}")]
    TransportInit(#[source] TransportError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Normalizer already set")]
    NormalizerAlreadySet,
}

/// Failure of the transport client.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid transport configuration: {0}")]
    InvalidConfig(String),

    #[error("Connection failed: {0}")]
    Connect(#[source] std::io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("Transport is closed")]
    Closed,

    #[error("{0}")]
    Other(String),
}

/// Failure reported by a user supplied normalizer.
#[derive(Error, Debug)]
#[error("Normalization failed: {message}")]
pub struct NormalizationError {
    message: String,
}

impl NormalizationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
