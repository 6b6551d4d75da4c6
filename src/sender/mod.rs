//! Transport clients.
//!
//! The forwarder only knows the [`Transport`] trait. [`FluentTransport`] is
//! the bundled implementation speaking the Fluent forward protocol over TCP.

pub mod config;
pub mod fluent;
pub mod stats;

pub use config::{ConfigError, FluentConfig};
pub use fluent::FluentTransport;
pub use stats::{TransportStats, TransportStatsSnapshot};

use crate::domain::{Record, TransportError};

#[cfg(test)]
use mockall::automock;

/// Connection to a remote log collector.
///
/// `post` is called concurrently from every thread that logs, so
/// implementations must be safe for concurrent use.
#[cfg_attr(test, automock)]
pub trait Transport: Send + Sync {
    /// Send one tagged event.
    fn post(&self, tag: &str, record: &Record) -> Result<(), TransportError>;

    /// Release the connection.
    fn close(&self) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn post(&self, tag: &str, record: &Record) -> Result<(), TransportError> {
        (**self).post(tag, record)
    }

    fn close(&self) -> Result<(), TransportError> {
        (**self).close()
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn post(&self, tag: &str, record: &Record) -> Result<(), TransportError> {
        (**self).post(tag, record)
    }

    fn close(&self) -> Result<(), TransportError> {
        (**self).close()
    }
}
