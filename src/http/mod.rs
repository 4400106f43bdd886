//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, request ID, limits, timeout, tracing)
//!     → ingest handler (buffer body, build Request<Bytes>)
//!     → SourceHandler::get_events
//!     → Channel::put_all
//!     → response.rs (map errors to status codes)
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod tls;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use response::IngestError;
pub use server::{AppState, HttpServer};
