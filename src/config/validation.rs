//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, paths and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::RouterConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("tenancy.base_domain: {0:?} must be a bare host (no scheme, path or spaces)")]
    InvalidBaseDomain(String),

    #[error("{field}: pattern {value:?} must start with '/'")]
    InvalidPath { field: &'static str, value: String },

    #[error("{0}: must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("observability.log_format: unknown format {0:?} (expected \"pretty\" or \"json\")")]
    UnknownLogFormat(String),

    #[error("auth.user_header: {0:?} is not a valid header name")]
    InvalidHeaderName(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    check_authority(&mut errors, "upstream.address", &config.upstream.address);
    if config.observability.metrics_enabled {
        check_address(&mut errors, "observability.metrics_address", &config.observability.metrics_address);
    }

    let base = &config.tenancy.base_domain;
    if base.contains("://") || base.contains('/') || base.chars().any(char::is_whitespace) {
        errors.push(ValidationError::InvalidBaseDomain(base.clone()));
    }

    for route in &config.auth.public_routes {
        check_path(&mut errors, "auth.public_routes", route);
    }
    check_path(&mut errors, "auth.sign_in_url", &config.auth.sign_in_url);
    for pattern in &config.matcher.include {
        check_path(&mut errors, "matcher.include", pattern);
    }
    for prefix in &config.matcher.exclude_prefixes {
        check_path(&mut errors, "matcher.exclude_prefixes", prefix);
    }

    if let Some(header) = &config.auth.user_header {
        if axum::http::HeaderName::from_bytes(header.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidHeaderName(header.clone()));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.upstream_secs"));
    }

    match config.observability.log_format.as_str() {
        "pretty" | "json" => {}
        other => errors.push(ValidationError::UnknownLogFormat(other.to_string())),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

/// `host:port`, where host may be a name (`app:3000`).
fn check_authority(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    let valid = value
        .parse::<axum::http::uri::Authority>()
        .map(|a| a.port_u16().is_some() && !a.host().is_empty())
        .unwrap_or(false);
    if !valid {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_path(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if !value.starts_with('/') {
        errors.push(ValidationError::InvalidPath {
            field,
            value: value.to_string(),
        });
    }
}
