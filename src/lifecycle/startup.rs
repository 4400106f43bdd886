//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize all subsystems in dependency order
//! - Start background tasks (sink, config watcher, signal handler)
//! - Bind listeners and begin accepting traffic
//! - Tear everything down in reverse order once the server stops
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when ready)
//! - The sink outlives the server, so every accepted event is written

use std::net::SocketAddr;
use std::path::PathBuf;

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::watcher::ConfigWatcher;
use crate::config::SourceConfig;
use crate::http::tls::load_tls_config;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::pipeline::{channel, LoggerSink, SinkError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid address '{0}'")]
    Address(String),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("failed to load TLS material: {0}")]
    Tls(std::io::Error),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error("failed to watch config file: {0}")]
    Watch(#[from] notify::Error),

    #[error("server error: {0}")]
    Server(std::io::Error),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

fn parse_addr(address: &str) -> Result<SocketAddr, StartupError> {
    address
        .parse()
        .map_err(|_| StartupError::Address(address.to_string()))
}

/// Run the source until a termination signal arrives.
///
/// `config_path`, when given, is watched and handler changes are applied live.
pub async fn run(config: SourceConfig, config_path: Option<PathBuf>) -> Result<(), StartupError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        path = %config.listener.path,
        forward_headers = ?config.handler.forward_headers,
        channel_capacity = config.channel.capacity,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(parse_addr(&config.observability.metrics_address)?)?;
    }

    // Sink first, so the channel always has a consumer
    let (events_tx, events_rx) = channel(config.channel.capacity);
    let sink_stop = Shutdown::new();
    let sink_signal = sink_stop.subscribe();
    let mut sink = LoggerSink::new(events_rx, tokio::io::stdout(), config.sink.batch_size);
    let sink_task = tokio::spawn(async move { sink.run(sink_signal).await });

    let (_watcher, config_updates) = match &config_path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let shutdown = Shutdown::new();
    tokio::spawn(signals::wait_for_signal(shutdown.clone()));

    let server = HttpServer::new(config.clone(), events_tx);
    let server_shutdown = shutdown.subscribe();
    let served = match &config.listener.tls {
        Some(tls) => {
            let tls_config = load_tls_config(tls).await.map_err(StartupError::Tls)?;
            let addr = parse_addr(&config.listener.bind_address)?;
            server
                .run_tls(addr, tls_config, config_updates, server_shutdown)
                .await
        }
        None => {
            let listener = TcpListener::bind(&config.listener.bind_address)
                .await
                .map_err(|source| StartupError::Bind {
                    address: config.listener.bind_address.clone(),
                    source,
                })?;
            server.run(listener, config_updates, server_shutdown).await
        }
    };

    // Server is gone, so no more events can arrive
    sink_stop.trigger();
    match sink_task.await {
        Ok(result) => {
            let written = result?;
            tracing::info!(written, "Sink stopped");
        }
        Err(e) => tracing::error!(error = %e, "Sink task failed"),
    }

    served.map_err(StartupError::Server)
}
