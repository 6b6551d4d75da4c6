//! Tags built from the message text, plus a normalizer for tab separated
//! `key\tvalue` lines.
//!
//! cargo run --example extended -- --count 3

use anyhow::Context;
use clap::Parser;
use fluent_writer::logging::{self, LogFormat, LogLevel};
use fluent_writer::sender::FluentConfig;
use fluent_writer::{FluentWriter, NormalizationError, Record};
use serde_json::Value;
use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    fluent: FluentConfig,

    /// Optional TOML file overriding the fluent flags
    #[arg(long)]
    config_file: Option<std::path::PathBuf>,

    /// Number of rounds to emit (0 runs forever)
    #[arg(long, default_value = "0")]
    count: u64,
}

/// Tag from the message text.
fn tag_from_message(raw: &[u8], prefix: &str) -> String {
    let msg = String::from_utf8_lossy(raw);
    if msg.contains("debug") {
        format!("{prefix}.debug")
    } else if msg.contains("error") {
        format!("{prefix}.error")
    } else if msg.contains("info") {
        format!("{prefix}.info")
    } else {
        format!("{prefix}.logs")
    }
}

/// `key\tvalue` becomes `{"key": "value"}`; anything else is declined.
fn tab_separated(raw: &[u8]) -> Result<Option<Record>, NormalizationError> {
    let line = std::str::from_utf8(raw).map_err(|e| NormalizationError::new(e.to_string()))?;
    let Some((key, value)) = line.trim_end().split_once('\t') else {
        return Ok(None);
    };

    let mut record = Record::new();
    record.insert(key.to_string(), Value::String(value.to_string()));
    Ok(Some(record))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = match &args.config_file {
        Some(path) => FluentConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => args.fluent,
    };

    let writer = FluentWriter::with_tag_constructor(config, "app", tag_from_message)
        .context("failed to create fluent writer")?;
    writer.set_normalizer(tab_separated)?;
    let writer = Arc::new(writer);

    logging::init_with_writer(writer.clone(), LogFormat::Plain, LogLevel::Debug)?;

    // Anything that takes an io::Write can use the writer directly too.
    let mut direct = writer.as_ref();

    let mut round = 0;
    while args.count == 0 || round < args.count {
        info!(animal = "walrus", "A walrus appears");
        warn!(animal = "tiger", "A tiger appears");
        debug!(animal = "bird", "A bird appears");

        writeln!(direct, "requestID\t123455")?;
        writeln!(direct, "current user count\t5")?;

        round += 1;
        thread::sleep(Duration::from_secs(1));
    }

    writer.close().context("failed to close fluent writer")?;
    Ok(())
}
