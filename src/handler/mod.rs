//! Request handler subsystem.
//!
//! # Data Flow
//! ```text
//! Context (forwardHeaders=...)
//!     → SourceHandler::configure (builds the header allow-list)
//!
//! HTTP request (headers + NDJSON body)
//!     → headers.rs (snapshot of allow-listed headers)
//!     → lines.rs (split body on \n, \r\n, \r)
//!     → plain_json.rs (syntax check per line, one Event per line)
//!     → Vec<Event> or BadRequest
//! ```
//!
//! # Design Decisions
//! - Handlers are configured before they are shared; `get_events` takes `&self`
//! - A request either yields all of its events or none of them
//! - The allow-list belongs to the handler instance, never to process state

pub mod context;
pub mod error;
pub mod headers;
pub mod lines;
pub mod plain_json;

use axum::body::Bytes;
use axum::http::Request;

use crate::event::Event;

pub use context::{Context, FORWARD_HEADERS};
pub use error::BadRequest;
pub use headers::HeaderAllowList;
pub use plain_json::PlainJsonHandler;

/// Converts an inbound HTTP request into events.
///
/// Implementations are configured once with [`SourceHandler::configure`] and
/// then shared across concurrent requests.
pub trait SourceHandler: Send + Sync {
    /// Apply configuration. Malformed values are logged, never fatal.
    fn configure(&mut self, context: &Context);

    /// Build the events for one request, or reject the whole request.
    fn get_events(&self, request: &Request<Bytes>) -> Result<Vec<Event>, BadRequest>;
}
