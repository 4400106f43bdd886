//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::time::Duration;

use ndjson_source::config::SourceConfig;
use ndjson_source::http::HttpServer;
use ndjson_source::lifecycle::Shutdown;
use ndjson_source::pipeline::{channel, ChannelReceiver};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// A source running on an ephemeral local port.
pub struct TestSource {
    pub addr: SocketAddr,
    pub events: ChannelReceiver,
    pub shutdown: Shutdown,
    #[allow(dead_code)]
    pub config_updates: mpsc::UnboundedSender<SourceConfig>,
}

impl TestSource {
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }
}

/// Start a source with the given config, bound to 127.0.0.1 on a free port.
pub async fn start_source(mut config: SourceConfig) -> TestSource {
    config.listener.bind_address = "127.0.0.1:0".into();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (events_tx, events) = channel(config.channel.capacity);
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, events_tx);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestSource {
        addr,
        events,
        shutdown,
        config_updates,
    }
}

/// Client that never reuses connections, so shutdown is not held up.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
