//! JSON-formatted `tracing` events forwarded with tags built from `level`.
//!
//! FLUENT_HOST=127.0.0.1 FLUENT_PORT=24224 cargo run --example app-with-tracing

use anyhow::Context;
use clap::Parser;
use fluent_writer::FluentWriter;
use fluent_writer::logging::{self, LogFormat, LogLevel};
use fluent_writer::sender::FluentConfig;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    fluent: FluentConfig,

    /// Tag prefix
    #[arg(long, default_value = "app")]
    tag_prefix: String,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "debug")]
    log_level: LogLevel,

    /// Number of rounds to emit (0 runs forever)
    #[arg(long, default_value = "0")]
    count: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let writer = FluentWriter::new(args.fluent, args.tag_prefix, ["level"])
        .context("failed to create fluent writer")?;
    let writer = Arc::new(writer);

    logging::init_with_writer(writer.clone(), LogFormat::Json, args.log_level)?;

    let mut round = 0;
    while args.count == 0 || round < args.count {
        info!(requestID = "45234523", path = "/", "Got a request");
        warn!(requestID = "546745643", path = "/tardis", user = "TheMaster", "Access denied");
        debug!(requestID = "546745643", path = "/tardis", user = "TheDoctor", "Admin access");

        round += 1;
        thread::sleep(Duration::from_millis(100));
    }

    writer.close().context("failed to close fluent writer")?;
    Ok(())
}
