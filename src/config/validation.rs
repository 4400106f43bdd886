//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (capacities and timeouts > 0, addresses parse)
//! - Detect the ingestion path colliding with the health route
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SourceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::SourceConfig;

/// Path served by the health endpoint.
pub const HEALTH_PATH: &str = "/health";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("listener.path: '{0}' must be a literal path starting with '/' and must not be /health")]
    InvalidPath(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("observability.log_level: unknown level '{0}'")]
    UnknownLogLevel(String),

    #[error("listener.tls: {0} must not be empty")]
    EmptyTlsPath(&'static str),
}

/// Whether the router would treat `path` as a plain literal.
///
/// Braces introduce captures, and segments starting with `:` or `*` are
/// rejected by the router outright.
fn is_literal_route(path: &str) -> bool {
    !path.contains(['{', '}'])
        && path
            .split('/')
            .all(|segment| !segment.starts_with(':') && !segment.starts_with('*'))
}

/// Check a parsed configuration, collecting every problem.
pub fn validate_config(config: &SourceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    let path = &config.listener.path;
    if !path.starts_with('/') || path == HEALTH_PATH || !is_literal_route(path) {
        errors.push(ValidationError::InvalidPath(path.clone()));
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.trim().is_empty() {
            errors.push(ValidationError::EmptyTlsPath("cert_path"));
        }
        if tls.key_path.trim().is_empty() {
            errors.push(ValidationError::EmptyTlsPath("key_path"));
        }
    }

    if config.channel.capacity == 0 {
        errors.push(ValidationError::Zero("channel.capacity"));
    }
    if config.sink.batch_size == 0 {
        errors.push(ValidationError::Zero("sink.batch_size"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero("security.max_body_size"));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::TlsConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SourceConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = SourceConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.listener.path = HEALTH_PATH.into();
        config.timeouts.request_secs = 0;
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Zero("timeouts.request_secs")));
        assert!(errors.contains(&ValidationError::UnknownLogLevel("loud".into())));
    }

    #[test]
    fn test_path_must_be_absolute() {
        let mut config = SourceConfig::default();
        config.listener.path = "events".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidPath("events".into())]);
    }

    #[test]
    fn test_path_rejects_route_syntax() {
        for path in ["/:events", "/{open", "/close}", "/api/*rest", "/{id}"] {
            let mut config = SourceConfig::default();
            config.listener.path = path.into();
            let errors = validate_config(&config).unwrap_err();
            assert_eq!(errors, vec![ValidationError::InvalidPath(path.into())], "{path}");
        }

        let mut config = SourceConfig::default();
        config.listener.path = "/api/v1/events".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = SourceConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_err());

        config.observability.metrics_enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_tls_paths() {
        let mut config = SourceConfig::default();
        config.listener.tls = Some(TlsConfig {
            cert_path: "cert.pem".into(),
            key_path: " ".into(),
        });
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyTlsPath("key_path")]);
    }
}
