//! Handler for plain newline-delimited JSON bodies.
//!
//! Every non-empty line of the body must be one JSON value. Lines are only
//! checked for syntax; the event body is the line exactly as received.
//! Empty lines are skipped. A line of only whitespace is an empty JSON
//! document, read as `null`, and still yields an event.

use axum::body::Bytes;
use axum::http::Request;
use serde::de::IgnoredAny;

use super::context::{Context, FORWARD_HEADERS};
use super::error::BadRequest;
use super::headers::HeaderAllowList;
use super::lines::BodyLines;
use super::SourceHandler;
use crate::event::Event;

/// Turns each JSON line of a request body into one [`Event`].
#[derive(Debug, Clone, Default)]
pub struct PlainJsonHandler {
    forward_headers: HeaderAllowList,
}

impl PlainJsonHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and configure a handler in one step.
    pub fn from_context(context: &Context) -> Self {
        let mut handler = Self::new();
        handler.configure(context);
        handler
    }

    pub fn forward_headers(&self) -> &HeaderAllowList {
        &self.forward_headers
    }
}

impl SourceHandler for PlainJsonHandler {
    fn configure(&mut self, context: &Context) {
        if let Some(raw) = context.get_string(FORWARD_HEADERS) {
            let added = self.forward_headers.extend_from_csv(raw);
            tracing::debug!(
                added,
                forward_headers = ?self.forward_headers.names(),
                "Configured forwarded headers"
            );
        }
    }

    fn get_events(&self, request: &Request<Bytes>) -> Result<Vec<Event>, BadRequest> {
        let headers = self.forward_headers.snapshot(request.headers());
        let mut events = Vec::new();

        for (line, raw) in BodyLines::new(request.body()).enumerate() {
            if raw.is_empty() {
                continue;
            }
            let text = std::str::from_utf8(raw)
                .map_err(|source| BadRequest::InvalidEncoding { line, source })?;

            if !text.trim().is_empty() {
                serde_json::from_str::<IgnoredAny>(text)
                    .map_err(|source| BadRequest::MalformedJson { line, source })?;
            }

            events.push(Event::new(raw, headers.clone()));
        }

        if events.is_empty() {
            tracing::debug!("No event is generated");
        }
        Ok(events)
    }
}
