//! Bad-request errors raised while turning a body into events.

use thiserror::Error;

/// The client sent a body that cannot be turned into events.
///
/// `line` is the 0-based index of the offending physical line in the body.
#[derive(Debug, Error)]
pub enum BadRequest {
    /// The line is not syntactically valid JSON.
    #[error("HTTP body line #{line} is not a valid JSON object: {source}")]
    MalformedJson {
        line: usize,
        source: serde_json::Error,
    },

    /// The line is not valid UTF-8, so it cannot be JSON text.
    #[error("HTTP body line #{line} is not valid UTF-8: {source}")]
    InvalidEncoding {
        line: usize,
        source: std::str::Utf8Error,
    },
}

impl BadRequest {
    /// Index of the line that failed.
    pub fn line(&self) -> usize {
        match self {
            BadRequest::MalformedJson { line, .. } | BadRequest::InvalidEncoding { line, .. } => *line,
        }
    }
}
