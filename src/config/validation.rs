//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every rule target is an absolute URL without trailing slash
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RedirectorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::RedirectorConfig;
use crate::routing::url::{decompose, UrlError};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} {value:?}: not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("rule with empty host")]
    EmptyHost,

    #[error("rule for {host}: {source}")]
    InvalidTarget {
        host: String,
        #[source]
        source: UrlError,
    },

    #[error("rule for {host}: target {target:?} must not end with '/'")]
    TrailingSlash { host: String, target: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &RedirectorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    for (host, rule) in &config.rules {
        if host.trim().is_empty() {
            errors.push(ValidationError::EmptyHost);
        }
        if let Err(source) = decompose(&rule.target) {
            errors.push(ValidationError::InvalidTarget {
                host: host.clone(),
                source,
            });
        } else if rule.target.ends_with('/') {
            errors.push(ValidationError::TrailingSlash {
                host: host.clone(),
                target: rule.target.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
