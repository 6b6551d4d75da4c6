//! Wiring a [`FluentWriter`](crate::FluentWriter) into `tracing`.
//!
//! The subscriber built here writes every event into the given `MakeWriter`
//! with a filter built from `RUST_LOG` or a default level.

use clap::ValueEnum;
use thiserror::Error;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Logging initialization failed: {details}")]
    LoggingInitFailed {
        details: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// How events are rendered before they reach the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// One JSON object per event, fields flattened to the top level.
    #[default]
    Json,
    /// Bare message and fields, no timestamp, level or target.
    Plain,
}

// Our own diagnostics are kept at warn so a verbose application filter does
// not feed them back into the collector.
const DEFAULT_DIRECTIVES: &[&str] = &["fluent_writer=warn"];

pub fn build_filter_string(level: LogLevel) -> String {
    let mut parts = Vec::with_capacity(DEFAULT_DIRECTIVES.len() + 1);
    parts.push(level.as_str());
    parts.extend_from_slice(DEFAULT_DIRECTIVES);
    parts.join(",")
}

fn build_filter(level: LogLevel) -> Result<EnvFilter, LoggingError> {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return EnvFilter::try_from_default_env().map_err(|e| LoggingError::LoggingInitFailed {
            details: format!("Invalid {}", EnvFilter::DEFAULT_ENV),
            source: Box::new(e),
        });
    }

    let filter_string = build_filter_string(level);
    EnvFilter::try_new(&filter_string).map_err(|e| LoggingError::LoggingInitFailed {
        details: format!("Failed to create EnvFilter with '{filter_string}'"),
        source: Box::new(e),
    })
}

/// Builds a subscriber writing into `writer` without installing it.
pub fn subscriber_with_writer<W>(
    writer: W,
    format: LogFormat,
    level: LogLevel,
) -> Result<impl Subscriber + Send + Sync + 'static, LoggingError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = build_filter(level)?;

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match format {
        LogFormat::Json => fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(false)
            .with_writer(writer)
            .with_filter(filter)
            .boxed(),
        LogFormat::Plain => fmt::layer()
            .without_time()
            .with_level(false)
            .with_target(false)
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(filter)
            .boxed(),
    };

    Ok(tracing_subscriber::registry().with(layer))
}

/// Installs the subscriber from [`subscriber_with_writer`] as the global
/// default. Fails instead of panicking when one is already set.
pub fn init_with_writer<W>(writer: W, format: LogFormat, level: LogLevel) -> Result<(), LoggingError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let subscriber = subscriber_with_writer(writer, format, level)?;
    tracing::subscriber::set_global_default(subscriber).map_err(|e| {
        LoggingError::LoggingInitFailed {
            details: "Failed to set global tracing subscriber".to_string(),
            source: Box::new(e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_string() {
        assert_eq!(build_filter_string(LogLevel::Info), "info,fluent_writer=warn");
        assert_eq!(build_filter_string(LogLevel::Trace), "trace,fluent_writer=warn");
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(tracing::Level::from(LogLevel::Error), tracing::Level::ERROR);
        assert_eq!(tracing::Level::from(LogLevel::Warn), tracing::Level::WARN);
        assert_eq!(tracing::Level::from(LogLevel::Info), tracing::Level::INFO);
        assert_eq!(tracing::Level::from(LogLevel::Debug), tracing::Level::DEBUG);
        assert_eq!(tracing::Level::from(LogLevel::Trace), tracing::Level::TRACE);
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!(LogFormat::from_str("json", true).unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("plain", true).unwrap(), LogFormat::Plain);
        assert_eq!(LogFormat::default(), LogFormat::Json);
    }
}
