//! Configuration validation.
//!
//! Serde handles syntax; this checks what serde cannot. Whether the address
//! is actually bindable is only known at bind time and is reported as a
//! listener error instead.

use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.host must not be empty")]
    EmptyHost,

    #[error("listener.host {0:?} must not contain whitespace")]
    HostWhitespace(String),

    #[error("listener.host is {0} bytes long, the limit is 253")]
    HostTooLong(usize),
}

/// Longest host name DNS allows.
pub const MAX_HOST_LEN: usize = 253;

/// Validate a configuration, returning every error found. The checks are
/// independent of each other.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let host = &config.listener.host;

    if host.is_empty() {
        errors.push(ValidationError::EmptyHost);
    }
    if host.chars().any(char::is_whitespace) {
        errors.push(ValidationError::HostWhitespace(host.clone()));
    }
    if host.len() > MAX_HOST_LEN {
        errors.push(ValidationError::HostTooLong(host.len()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
