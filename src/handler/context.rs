//! Key/value configuration handed to handlers.

use std::collections::HashMap;

use crate::config::HandlerConfig;

/// Context key naming the comma-separated list of headers to forward.
pub const FORWARD_HEADERS: &str = "forwardHeaders";

/// String parameters for [`super::SourceHandler::configure`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    parameters: HashMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(key.into(), value.into());
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut context = Context::new();
        for (key, value) in iter {
            context.put(key, value);
        }
        context
    }
}

impl From<&HandlerConfig> for Context {
    fn from(config: &HandlerConfig) -> Self {
        let mut context = Context::new();
        if let Some(forward) = &config.forward_headers {
            context.put(FORWARD_HEADERS, forward.clone());
        }
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_handler_config() {
        let config = HandlerConfig {
            forward_headers: Some("X-Trace,X-Tenant".into()),
        };
        let context = Context::from(&config);
        assert_eq!(context.get_string(FORWARD_HEADERS), Some("X-Trace,X-Tenant"));

        let empty = Context::from(&HandlerConfig::default());
        assert_eq!(empty, Context::new());
        assert_eq!(empty.get_string(FORWARD_HEADERS), None);
    }

    #[test]
    fn test_from_iter_last_value_wins() {
        let context: Context = [("a", "1"), ("a", "2")].into_iter().collect();
        assert_eq!(context.get_string("a"), Some("2"));
    }
}
