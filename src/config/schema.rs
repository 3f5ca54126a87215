//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! redirector. All types derive Serde traits for deserialization from TOML.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::routing::RedirectStatus;

/// Root configuration for the redirector.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RedirectorConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Redirect plain-HTTP requests (per `X-Forwarded-Proto`) to HTTPS.
    pub force_ssl: bool,

    /// Verbose logging.
    pub debug: bool,

    /// Add `from=<request host>` to host-rule redirects.
    pub append_from: bool,

    /// Value of the `Server` header on every response.
    pub server_header: String,

    /// Hosts containing this string get locale-normalized donation paths.
    pub donation_host: Option<String>,

    /// Hosts containing this string consult the path redirect table.
    pub kv_host: Option<String>,

    /// JSON document holding the path redirect table.
    pub kv_table_path: Option<PathBuf>,

    /// Static host rules, keyed by hostname.
    pub rules: BTreeMap<String, HostRuleConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for RedirectorConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            force_ssl: false,
            debug: false,
            append_from: false,
            server_header: "host-redirector".to_string(),
            donation_host: None,
            kv_host: None,
            kv_table_path: None,
            rules: BTreeMap::new(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// One static host rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HostRuleConfig {
    /// Absolute destination URL, without trailing slash.
    pub target: String,

    /// `permanent` (301) or `temporary` (307).
    pub status: RedirectStatus,

    /// Append the request path to the target.
    #[serde(default)]
    pub preserve_path: bool,

    /// Replace the target query with the request query.
    #[serde(default)]
    pub preserve_query: bool,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 10 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
