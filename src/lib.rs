#![deny(warnings, rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
#![allow(
    clippy::missing_errors_doc,      // Errors are documented on the enums
    clippy::module_name_repetitions, // e.g. TransportError in sender module
    clippy::must_use_candidate,      // Annotated selectively on critical APIs
    clippy::doc_markdown
)]

//! Forward log output to Fluentd / Fluent Bit as tagged events.
//!
//! [`FluentWriter`] is a byte sink: hand it to anything that writes log lines
//! (`tracing_subscriber::fmt`, a `std::io::Write` consumer, ...) and every
//! line is classified, turned into a [`Record`], tagged and posted through a
//! [`Transport`].

pub mod domain;
pub mod logging;
pub mod parser;
pub mod sender;
pub mod tag;
pub mod writer;

pub use domain::{ForwarderError, NormalizationError, Record, TransportError};
pub use sender::{FluentConfig, FluentTransport, Transport};
pub use tag::{TagConstructor, TagStrategy};
pub use writer::FluentWriter;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
