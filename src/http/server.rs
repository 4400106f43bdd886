//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the ingestion and health handlers
//! - Wire up middleware (tracing, body limit, timeout, request ID)
//! - Bind server to a plain or TLS listener
//! - Dispatch request bodies to the current handler and queue the events
//! - Swap in a freshly configured handler on config reload

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_server::tls_rustls::RustlsConfig;
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::validation::HEALTH_PATH;
use crate::config::{HandlerConfig, SourceConfig};
use crate::handler::{Context, PlainJsonHandler, SourceHandler};
use crate::http::request::RequestIdExt;
use crate::http::response::IngestError;
use crate::observability::metrics;
use crate::pipeline::Channel;

/// Handler shared by all requests; replaced as a whole on reload.
pub type SharedHandler = Arc<ArcSwap<Box<dyn SourceHandler>>>;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub handler: SharedHandler,
    pub channel: Channel,
}

/// Build the configured request handler.
pub fn build_handler(config: &HandlerConfig) -> Box<dyn SourceHandler> {
    Box::new(PlainJsonHandler::from_context(&Context::from(config)))
}

/// HTTP server for the event source.
pub struct HttpServer {
    router: Router,
    config: SourceConfig,
    handler: SharedHandler,
}

impl HttpServer {
    /// Create a new HTTP server delivering events to `channel`.
    pub fn new(config: SourceConfig, channel: Channel) -> Self {
        let handler = build_handler(&config.handler);
        Self::with_handler(config, channel, handler)
    }

    /// Create a server around an already configured handler.
    pub fn with_handler(
        config: SourceConfig,
        channel: Channel,
        handler: Box<dyn SourceHandler>,
    ) -> Self {
        let handler: SharedHandler = Arc::new(ArcSwap::from_pointee(handler));
        let state = AppState {
            handler: handler.clone(),
            channel,
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            handler,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &SourceConfig, state: AppState) -> Router {
        let max_body = config.security.max_body_size;

        Router::new()
            .route(&config.listener.path, post(ingest_handler))
            .route(HEALTH_PATH, get(health_handler))
            .with_state(state)
            .layer(DefaultBodyLimit::max(max_body))
            .layer(RequestBodyLimitLayer::new(max_body))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Replace the handler with one built from `config`.
    ///
    /// Requests already running keep the handler they started with.
    pub fn reload_handler(&self, config: &HandlerConfig) {
        swap_handler(&self.handler, config);
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<SourceConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            path = %self.config.listener.path,
            "HTTP server starting"
        );

        let serve = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server shutting down");
            })
            .into_future();

        serve_with_reloads(self.handler, self.config, config_updates, serve).await?;
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server over TLS.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        config_updates: mpsc::UnboundedReceiver<SourceConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(
            address = %addr,
            path = %self.config.listener.path,
            "HTTPS server starting"
        );

        let handle = axum_server::Handle::new();
        let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTPS server shutting down");
            shutdown_handle.graceful_shutdown(Some(grace));
        });

        let serve = axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service());

        serve_with_reloads(self.handler, self.config, config_updates, serve).await?;
        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Apply config updates for as long as `serve` runs, however it ends.
async fn serve_with_reloads<F>(
    handler: SharedHandler,
    running: SourceConfig,
    updates: mpsc::UnboundedReceiver<SourceConfig>,
    serve: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = Result<(), std::io::Error>>,
{
    let reloader = tokio::spawn(apply_updates(handler, running, updates));
    let served = serve.await;
    reloader.abort();
    served
}

fn swap_handler(handler: &SharedHandler, config: &HandlerConfig) {
    handler.store(Arc::new(build_handler(config)));
    tracing::info!(
        forward_headers = ?config.forward_headers,
        "Request handler reconfigured"
    );
}

/// Config sections that differ from the running config but are only read at
/// startup.
fn restart_required(running: &SourceConfig, updated: &SourceConfig) -> Vec<&'static str> {
    let mut changed = Vec::new();
    if running.listener != updated.listener {
        changed.push("listener");
    }
    if running.channel != updated.channel {
        changed.push("channel");
    }
    if running.sink != updated.sink {
        changed.push("sink");
    }
    if running.timeouts != updated.timeouts {
        changed.push("timeouts");
    }
    if running.observability != updated.observability {
        changed.push("observability");
    }
    if running.security != updated.security {
        changed.push("security");
    }
    changed
}

async fn apply_updates(
    handler: SharedHandler,
    running: SourceConfig,
    mut updates: mpsc::UnboundedReceiver<SourceConfig>,
) {
    while let Some(config) = updates.recv().await {
        let ignored = restart_required(&running, &config);
        if !ignored.is_empty() {
            tracing::warn!(
                sections = ?ignored,
                "Config sections changed on reload take effect only after a restart"
            );
        }
        swap_handler(&handler, &config.handler);
    }
}

/// Ingestion handler: one POST body in, one batch of events queued.
async fn ingest_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let request_id = headers.request_id().to_string();

    let mut request = Request::new(body);
    *request.method_mut() = method;
    *request.uri_mut() = uri;
    *request.headers_mut() = headers;

    let response = match ingest(&state, &request) {
        Ok(count) => {
            tracing::debug!(request_id = %request_id, events = count, "Events accepted");
            StatusCode::OK.into_response()
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Request rejected");
            e.into_response()
        }
    };

    metrics::record_request(response.status().as_u16(), start);
    response
}

fn ingest(state: &AppState, request: &Request<Bytes>) -> Result<usize, IngestError> {
    let handler = state.handler.load();
    let events = handler.get_events(request)?;
    let count = state.channel.put_all(events)?;
    metrics::record_events_accepted(count);
    Ok(count)
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
