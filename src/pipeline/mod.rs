//! Event delivery subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP source (one batch per request)
//!     → channel.rs (bounded queue, whole batch or nothing)
//!     → sink.rs (drains in batches, writes JSON lines)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - A full channel rejects the request instead of blocking it
//! - The sink drains what is already queued before it stops

pub mod channel;
pub mod sink;

pub use channel::{channel, Channel, ChannelError, ChannelReceiver};
pub use sink::{LoggerSink, SinkError};
