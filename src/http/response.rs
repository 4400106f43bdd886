//! Mapping of ingestion failures to HTTP responses.
//!
//! - Malformed body → 400 Bad Request, with the failing line in the message
//! - Channel full or closed → 503 Service Unavailable, nothing delivered

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::handler::BadRequest;
use crate::observability::metrics;
use crate::pipeline::ChannelError;

/// Why an ingestion request was not accepted.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    BadRequest(#[from] BadRequest),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}

impl IngestError {
    pub fn status(&self) -> StatusCode {
        match self {
            IngestError::BadRequest(_) => StatusCode::BAD_REQUEST,
            IngestError::Channel(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn record(&self) {
        match self {
            IngestError::BadRequest(_) => metrics::record_bad_request(),
            IngestError::Channel(ChannelError::Full { .. }) => metrics::record_channel_rejection("full"),
            IngestError::Channel(ChannelError::Closed) => metrics::record_channel_rejection("closed"),
        }
    }
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        self.record();
        (self.status(), self.to_string()).into_response()
    }
}
