//! Request identification.
//!
//! Every request gets an `x-request-id` (UUID v4) unless the client sent one;
//! the same id is echoed on the response and attached to log lines.

use axum::http::HeaderMap;

/// Header carrying the request id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Read the request id from a header map.
pub trait RequestIdExt {
    fn request_id(&self) -> &str;
}

impl RequestIdExt for HeaderMap {
    fn request_id(&self) -> &str {
        self.get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}
