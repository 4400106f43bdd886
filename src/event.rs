//! Event model shared by the handler, channel and sink.

use std::collections::HashMap;

use serde::{Serialize, Serializer};

/// A single unit of data moved downstream: raw body bytes plus a header map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Header name to value. Keys are unique.
    pub headers: HashMap<String, String>,

    /// Raw bytes of the input line, without the line terminator.
    #[serde(serialize_with = "serialize_body")]
    pub body: Vec<u8>,
}

impl Event {
    /// Create an event from a body and a header map.
    pub fn new(body: impl Into<Vec<u8>>, headers: HashMap<String, String>) -> Self {
        Self {
            headers,
            body: body.into(),
        }
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

// Bodies come from validated JSON lines, so they are UTF-8 in practice.
fn serialize_body<S: Serializer>(body: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(body))
}
