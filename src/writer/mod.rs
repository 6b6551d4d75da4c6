//! The record forwarder.
//!
//! [`FluentWriter`] implements `std::io::Write` (also through a shared
//! reference) and `tracing_subscriber`'s `MakeWriter`, so one instance can be
//! shared by every thread that logs. Each write is classified, tagged and
//! posted; transport failures never reach the caller.

mod fallback;
mod reentry;

pub use fallback::FallbackSink;

use reentry::ForwardGuard;

use crate::domain::{ForwarderError, NormalizationError, Record, TransportError};
use crate::parser::{self, Normalizer};
use crate::sender::{FluentConfig, FluentTransport, Transport};
use crate::tag::TagStrategy;
use std::fmt;
use std::io;
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

pub struct FluentWriter<T: Transport = FluentTransport> {
    transport: T,
    // Fallback to ensure that there is always a tag
    tag_prefix: String,
    tag_strategy: TagStrategy,
    normalizer: OnceLock<Normalizer>,
    fallback: FallbackSink,
}

impl FluentWriter<FluentTransport> {
    /// Writer tagging each structured record with `tag_prefix` followed by
    /// the values of `tag_keys`, in order.
    pub fn new<I, S>(
        config: FluentConfig,
        tag_prefix: impl Into<String>,
        tag_keys: I,
    ) -> Result<Self, ForwarderError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let transport = FluentTransport::new(config).map_err(ForwarderError::TransportInit)?;
        Self::from_transport(transport, tag_prefix, TagStrategy::keys(tag_keys))
    }

    /// Writer whose tags all come from `constructor(raw, tag_prefix)`.
    pub fn with_tag_constructor<F>(
        config: FluentConfig,
        tag_prefix: impl Into<String>,
        constructor: F,
    ) -> Result<Self, ForwarderError>
    where
        F: Fn(&[u8], &str) -> String + Send + Sync + 'static,
    {
        let transport = FluentTransport::new(config).map_err(ForwarderError::TransportInit)?;
        Self::from_transport(transport, tag_prefix, TagStrategy::constructor(constructor))
    }
}

impl<T: Transport> FluentWriter<T> {
    pub fn from_transport(
        transport: T,
        tag_prefix: impl Into<String>,
        tag_strategy: TagStrategy,
    ) -> Result<Self, ForwarderError> {
        let tag_prefix = tag_prefix.into();
        if tag_prefix.is_empty() {
            return Err(ForwarderError::InvalidConfig(
                "tag prefix must not be empty".to_string(),
            ));
        }

        Ok(Self {
            transport,
            tag_prefix,
            tag_strategy,
            normalizer: OnceLock::new(),
            fallback: FallbackSink::default(),
        })
    }

    /// Attaches the normalizer consulted when a line is not a JSON object.
    ///
    /// Can only be done once per writer.
    pub fn set_normalizer<F>(&self, normalizer: F) -> Result<(), ForwarderError>
    where
        F: Fn(&[u8]) -> Result<Option<Record>, NormalizationError> + Send + Sync + 'static,
    {
        self.normalizer
            .set(parser::normalizer(normalizer))
            .map_err(|_| ForwarderError::NormalizerAlreadySet)
    }

    pub fn with_normalizer<F>(self, normalizer: F) -> Result<Self, ForwarderError>
    where
        F: Fn(&[u8]) -> Result<Option<Record>, NormalizationError> + Send + Sync + 'static,
    {
        self.set_normalizer(normalizer)?;
        Ok(self)
    }

    pub fn with_fallback(mut self, fallback: FallbackSink) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn tag_prefix(&self) -> &str {
        &self.tag_prefix
    }

    pub fn tag_strategy(&self) -> &TagStrategy {
        &self.tag_strategy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Forwards one raw line and returns the number of bytes consumed.
    ///
    /// Always consumes the whole input. A failed post is written to the
    /// fallback sink instead of being reported.
    ///
    /// A write that re-enters the writer on the same thread, such as one of
    /// the writer's own diagnostics routed back by the subscriber, is
    /// dropped.
    pub fn forward(&self, raw: &[u8]) -> usize {
        let Some(_guard) = ForwardGuard::enter() else {
            return raw.len();
        };

        let classified = parser::classify(raw, self.normalizer.get());
        let tag = self.tag_strategy.derive(
            &self.tag_prefix,
            raw,
            classified.path,
            &classified.record,
        );
        tracing::debug!(
            target: "fluent_writer",
            tag = %tag,
            path = classified.path.as_str(),
            "forwarding record"
        );
        self.send(&tag, &classified.record, classified.path);
        raw.len()
    }

    fn send(&self, tag: &str, record: &Record, path: parser::ParsePath) {
        if let Err(e) = self.transport.post(tag, record) {
            self.fallback.emit(record);
            tracing::warn!(
                target: "fluent_writer",
                tag,
                path = path.as_str(),
                error = %e,
                "failed to send record"
            );
        }
    }

    /// Closes the transport, returning its result unchanged.
    pub fn close(&self) -> Result<(), TransportError> {
        let _guard = ForwardGuard::enter();
        let result = self.transport.close();
        match &result {
            Ok(()) => tracing::info!(target: "fluent_writer", "fluent writer closed"),
            Err(e) => tracing::warn!(target: "fluent_writer", error = %e, "closing transport failed"),
        }
        result
    }
}

impl<T: Transport> io::Write for FluentWriter<T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.forward(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: Transport> io::Write for &FluentWriter<T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.forward(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a, T: Transport + 'a> MakeWriter<'a> for FluentWriter<T> {
    type Writer = &'a FluentWriter<T>;

    fn make_writer(&'a self) -> Self::Writer {
        self
    }
}

impl<T: Transport + fmt::Debug> fmt::Debug for FluentWriter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FluentWriter")
            .field("transport", &self.transport)
            .field("tag_prefix", &self.tag_prefix)
            .field("tag_strategy", &self.tag_strategy)
            .field("normalizer", &self.normalizer.get().is_some())
            .field("fallback", &self.fallback)
            .finish()
    }
}
