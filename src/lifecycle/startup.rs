//! Startup orchestration.
//!
//! # Responsibilities
//! - Compile the validated configuration into routing tables
//! - Load the path redirect table from disk
//! - Assemble the resolution engine

use std::sync::Arc;

use thiserror::Error;

use crate::config::RedirectorConfig;
use crate::routing::url::UrlError;
use crate::routing::{EngineSettings, HostTable, KvTable, RedirectEngine};

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("host rules: {0}")]
    HostRules(#[from] UrlError),
}

/// Build the engine for `config`.
///
/// A malformed host rule target is fatal; a missing or malformed path table
/// only yields an empty table.
pub fn build_engine(config: &RedirectorConfig) -> Result<RedirectEngine, StartupError> {
    let hosts = HostTable::from_config(&config.rules)?;

    let paths = match &config.kv_table_path {
        Some(path) => KvTable::load(path),
        None => KvTable::default(),
    };

    let settings = EngineSettings::from(config);

    tracing::info!(
        host_rules = hosts.len(),
        path_redirects = paths.len(),
        force_ssl = settings.force_ssl,
        donation_host = settings.donation_host.as_deref().unwrap_or("-"),
        kv_host = settings.kv_host.as_deref().unwrap_or("-"),
        "Redirect tables ready"
    );

    Ok(RedirectEngine::new(settings, Arc::new(hosts), Arc::new(paths)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HostRuleConfig;
    use crate::routing::RedirectStatus;
    use std::path::PathBuf;

    #[test]
    fn test_build_engine() {
        let mut config = RedirectorConfig::default();
        config.rules.insert(
            "example.com".to_string(),
            HostRuleConfig {
                target: "https://another-example.com".to_string(),
                status: RedirectStatus::Permanent,
                preserve_path: false,
                preserve_query: false,
            },
        );
        config.kv_table_path = Some(PathBuf::from("/nonexistent/redirects.json"));

        let engine = build_engine(&config).unwrap();
        assert_eq!(engine.hosts().len(), 1);
        assert!(engine.paths().is_empty());
    }

    #[test]
    fn test_bad_target_is_fatal() {
        let mut config = RedirectorConfig::default();
        config.rules.insert(
            "example.com".to_string(),
            HostRuleConfig {
                target: "not a url".to_string(),
                status: RedirectStatus::Permanent,
                preserve_path: false,
                preserve_query: false,
            },
        );
        assert!(matches!(
            build_engine(&config),
            Err(StartupError::HostRules(UrlError::InvalidUrl { .. }))
        ));
    }
}
