//! Static host → rule table.
//!
//! # Responsibilities
//! - Hold one redirect rule per legacy hostname
//! - Resolve an effective host to its rule
//!
//! # Design Decisions
//! - Built once at startup, immutable at runtime (thread-safe without locks)
//! - O(1) exact host lookup via HashMap; the caller normalizes the host
//! - Targets are decomposed at build time so a malformed target fails
//!   startup instead of individual requests

use std::collections::{BTreeMap, HashMap};

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::HostRuleConfig;
use crate::routing::url::{decompose, UrlError, UrlParts};

/// Redirect permanence of a host rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectStatus {
    /// 301 Moved Permanently.
    Permanent,
    /// 307 Temporary Redirect.
    Temporary,
}

impl RedirectStatus {
    pub fn status_code(self) -> StatusCode {
        match self {
            RedirectStatus::Permanent => StatusCode::MOVED_PERMANENTLY,
            RedirectStatus::Temporary => StatusCode::TEMPORARY_REDIRECT,
        }
    }
}

/// One static redirect rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRule {
    target: String,
    parts: UrlParts,
    pub status: RedirectStatus,
    pub preserve_path: bool,
    pub preserve_query: bool,
}

impl HostRule {
    /// Create a rule, validating its target URL.
    pub fn new(
        target: impl Into<String>,
        status: RedirectStatus,
        preserve_path: bool,
        preserve_query: bool,
    ) -> Result<Self, UrlError> {
        let target = target.into();
        let parts = decompose(&target)?;
        Ok(Self {
            target,
            parts,
            status,
            preserve_path,
            preserve_query,
        })
    }

    /// The configured destination URL.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The destination split into its components.
    pub fn parts(&self) -> &UrlParts {
        &self.parts
    }
}

/// Immutable table of static host rules.
#[derive(Debug, Clone, Default)]
pub struct HostTable {
    rules: HashMap<String, HostRule>,
}

impl HostTable {
    /// Build the table from configured rules. Host keys are lowercased.
    pub fn from_config(rules: &BTreeMap<String, HostRuleConfig>) -> Result<Self, UrlError> {
        let rules = rules
            .iter()
            .map(|(host, rule)| {
                let rule = HostRule::new(
                    rule.target.clone(),
                    rule.status,
                    rule.preserve_path,
                    rule.preserve_query,
                )?;
                Ok((host.to_lowercase(), rule))
            })
            .collect::<Result<HashMap<_, _>, UrlError>>()?;

        Ok(Self { rules })
    }

    /// Add a rule, replacing any existing rule for the same host.
    pub fn insert(&mut self, host: &str, rule: HostRule) {
        self.rules.insert(host.to_lowercase(), rule);
    }

    /// Exact-match lookup.
    pub fn lookup(&self, host: &str) -> Option<&HostRule> {
        self.rules.get(host)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_config(target: &str) -> HostRuleConfig {
        HostRuleConfig {
            target: target.to_string(),
            status: RedirectStatus::Permanent,
            preserve_path: false,
            preserve_query: false,
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(RedirectStatus::Permanent.status_code(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(RedirectStatus::Temporary.status_code(), StatusCode::TEMPORARY_REDIRECT);
    }

    #[test]
    fn test_lookup_is_exact() {
        let mut rules = BTreeMap::new();
        rules.insert("Example.com".to_string(), rule_config("https://another-example.com"));
        let table = HostTable::from_config(&rules).unwrap();

        assert_eq!(table.len(), 1);
        let rule = table.lookup("example.com").unwrap();
        assert_eq!(rule.target(), "https://another-example.com");
        assert_eq!(rule.parts().authority, "another-example.com");

        assert!(table.lookup("www.example.com").is_none());
        assert!(table.lookup("example.co").is_none());
        assert!(table.lookup("example.com:8080").is_none());
    }

    #[test]
    fn test_invalid_target_fails_build() {
        let mut rules = BTreeMap::new();
        rules.insert("example.com".to_string(), rule_config("another-example.com"));
        assert!(matches!(
            HostTable::from_config(&rules),
            Err(UrlError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_insert_replaces() {
        let mut table = HostTable::default();
        table.insert(
            "example.com",
            HostRule::new("https://a.example", RedirectStatus::Temporary, false, false).unwrap(),
        );
        table.insert(
            "EXAMPLE.com",
            HostRule::new("https://b.example", RedirectStatus::Permanent, true, true).unwrap(),
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("example.com").unwrap().target(), "https://b.example");
    }

    #[test]
    fn test_status_deserializes_lowercase() {
        let rule: HostRuleConfig = toml::from_str(
            r#"
            target = "https://another-example.com"
            status = "temporary"
            "#,
        )
        .unwrap();
        assert_eq!(rule.status, RedirectStatus::Temporary);
        assert!(!rule.preserve_path);
    }
}
