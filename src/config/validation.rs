//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, status codes valid)
//! - Check settings that only make sense together (watch needs a file)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Mapping documents are not validated here; their records are only
//!   checked for shape by the loader

use std::net::SocketAddr;

use axum::http::StatusCode;
use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem in a server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("fallback.status `{0}` is not a valid HTTP status code")]
    FallbackStatus(u16),

    #[error("mappings.watch is set but mappings.file is missing")]
    WatchWithoutFile,

    #[error("redirects[{0}] has an empty path")]
    EmptyRedirectPath(usize),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if StatusCode::from_u16(config.fallback.status).is_err() {
        errors.push(ValidationError::FallbackStatus(config.fallback.status));
    }

    if config.mappings.watch && config.mappings.file.is_none() {
        errors.push(ValidationError::WatchWithoutFile);
    }

    for (i, redirect) in config.redirects.iter().enumerate() {
        if redirect.path.is_empty() {
            errors.push(ValidationError::EmptyRedirectPath(i));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
