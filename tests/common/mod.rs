//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use host_redirector::config::{HostRuleConfig, RedirectorConfig};
use host_redirector::http::HttpServer;
use host_redirector::lifecycle::build_engine;
use host_redirector::routing::{
    EngineSettings, HostTable, KvEntry, KvTable, RedirectEngine, RedirectStatus,
};

pub const TRADEMARKS_TARGET: &str = "https://mozillafoundation.org/en/who-we-are/licensing/";
pub const CAMPAIGN_TARGET: &str = "https://mozillafoundation.org/en/campaigns/";

/// A rule with the given target, status and preserve flags.
pub fn rule(target: &str, status: RedirectStatus, preserve_path: bool, preserve_query: bool) -> HostRuleConfig {
    HostRuleConfig {
        target: target.to_string(),
        status,
        preserve_path,
        preserve_query,
    }
}

/// Config with a single rule for `example.com`.
pub fn single_rule_config(rule: HostRuleConfig) -> RedirectorConfig {
    let mut config = RedirectorConfig::default();
    config.rules.insert("example.com".to_string(), rule);
    config
}

/// Config mirroring a production deployment: donation and path-table hosts.
pub fn foundation_config() -> RedirectorConfig {
    let mut config = RedirectorConfig::default();
    config.donation_host = Some("donate.mozilla.org".to_string());
    config.kv_host = Some("mozillafoundation.org".to_string());
    config.rules.insert(
        "donate.mozilla.org".to_string(),
        rule("https://foundation.mozilla.org", RedirectStatus::Permanent, true, true),
    );
    config.rules.insert(
        "mozillafoundation.org".to_string(),
        rule("https://foundation.mozilla.org", RedirectStatus::Permanent, true, true),
    );
    config.rules.insert(
        "example.com".to_string(),
        rule("https://another-example.com", RedirectStatus::Temporary, false, false),
    );
    config
}

/// Path table used together with `foundation_config`.
pub fn foundation_paths() -> KvTable {
    KvTable::from_entries([
        (
            "/about/trademarks".to_string(),
            KvEntry {
                redirect_to: TRADEMARKS_TARGET.to_string(),
                is_permanent: true,
            },
        ),
        (
            "/about/trademarks/?q=test&utf=a_campaign".to_string(),
            KvEntry {
                redirect_to: CAMPAIGN_TARGET.to_string(),
                is_permanent: false,
            },
        ),
    ])
}

/// Router for `config` with tables built the way startup builds them.
pub fn router(config: RedirectorConfig) -> Router {
    let engine = build_engine(&config).expect("valid test config");
    HttpServer::new(config, engine).router()
}

/// Router for `config` with an injected path table.
pub fn router_with_paths(config: RedirectorConfig, paths: KvTable) -> Router {
    let hosts = HostTable::from_config(&config.rules).expect("valid test rules");
    let engine = RedirectEngine::new(
        EngineSettings::from(&config),
        Arc::new(hosts),
        Arc::new(paths),
    );
    HttpServer::new(config, engine).router()
}
