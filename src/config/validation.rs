//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid, gas non-zero)
//! - Check the endpoint forms a usable URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::ClientConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a parsed configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.endpoint.host.trim().is_empty() {
        errors.push(ValidationError::new("endpoint.host", "must not be empty"));
    } else if url::Url::parse(&format!("http://{}:{}", config.endpoint.host, config.endpoint.port)).is_err() {
        errors.push(ValidationError::new(
            "endpoint.host",
            format!("'{}' is not a valid host", config.endpoint.host),
        ));
    }

    if config.endpoint.port == 0 {
        errors.push(ValidationError::new("endpoint.port", "must be greater than 0"));
    }

    if config.gas.limit == 0 {
        errors.push(ValidationError::new("gas.limit", "must be greater than 0"));
    }

    if config.rpc.timeout_secs == 0 {
        errors.push(ValidationError::new("rpc.timeout_secs", "must be greater than 0"));
    }

    if config.rpc.connect_timeout_secs == 0 {
        errors.push(ValidationError::new("rpc.connect_timeout_secs", "must be greater than 0"));
    }

    if tracing_subscriber::EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("'{}' is not a valid filter", config.observability.log_level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
