//! NDJSON HTTP event source.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client POST (NDJSON body)
//!     ──────────────────────────▶ http server ──▶ PlainJsonHandler ──▶ Channel ──▶ LoggerSink ──▶ stdout
//!                                  │  request id      │ one Event per line      (bounded)     (JSON lines)
//!                                  │  body limit      │ forwarded headers
//!                                  │  timeout         │
//!                                  ▼                  ▼
//!                               400 / 413 / 503     BadRequest (line index)
//!
//!     Cross-cutting: config (TOML + hot reload), observability (tracing, metrics), lifecycle (signals)
//! ```

use std::path::PathBuf;

use clap::Parser;

use ndjson_source::config::{load_config, SourceConfig};
use ndjson_source::lifecycle::startup;
use ndjson_source::observability::logging;

#[derive(Parser)]
#[command(name = "ndjson-source")]
#[command(about = "HTTP source turning newline-delimited JSON into events", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Watched for changes when given.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SourceConfig::default(),
    };

    logging::init_logging(&config.observability)?;
    tracing::info!("ndjson-source v{} starting", env!("CARGO_PKG_VERSION"));

    startup::run(config, args.config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
