//! HTTP event source for newline-delimited JSON.
//!
//! Each line of a POSTed body becomes one [`Event`]; allow-listed request
//! headers are copied into every event of that request.

pub mod config;
pub mod event;
pub mod handler;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;

pub use config::SourceConfig;
pub use event::Event;
pub use handler::{BadRequest, Context, PlainJsonHandler, SourceHandler};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
