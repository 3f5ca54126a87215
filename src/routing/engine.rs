//! Redirect resolution.
//!
//! # Responsibilities
//! - Turn a request descriptor into exactly one redirect decision
//! - Apply the guards in order: SSL gate, donation rewrite, blocked assets,
//!   path table, host table
//!
//! # Design Decisions
//! - Pure: no I/O, no locking, no shared mutable state
//! - Tables are injected as immutable `Arc` snapshots
//! - Failures are decisions, not errors

use std::sync::Arc;

use axum::http::StatusCode;
use percent_encoding::percent_decode_str;
use url::form_urlencoded;

use crate::config::RedirectorConfig;
use crate::routing::host_table::HostTable;
use crate::routing::kv_table::KvTable;
use crate::routing::locale::normalize_donation_path;
use crate::routing::url::compose;

/// Paths ending in these suffixes are answered with 410 Gone.
pub const BLOCKED_ASSET_SUFFIXES: [&str; 6] = [".js", ".css", ".png", ".svg", ".ico", ".txt"];

/// The routing-relevant view of an inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// `Host` header, lowercased. May be empty.
    pub host: String,
    /// `X-Forwarded-Host`, lowercased.
    pub forwarded_host: Option<String>,
    /// `X-Forwarded-Proto`, lowercased.
    pub forwarded_proto: Option<String>,
    /// Request path with its leading slash, as received.
    pub path: String,
    /// Raw query string without the `?`.
    pub query: String,
}

impl RequestDescriptor {
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_forwarded_host(mut self, host: impl Into<String>) -> Self {
        self.forwarded_host = Some(host.into());
        self
    }

    pub fn with_forwarded_proto(mut self, proto: impl Into<String>) -> Self {
        self.forwarded_proto = Some(proto.into());
        self
    }

    /// True when the front proxy reports an HTTPS connection.
    pub fn is_secure(&self) -> bool {
        self.forwarded_proto.as_deref() == Some("https")
    }

    /// `X-Forwarded-Host` when present and non-empty, `Host` otherwise.
    pub fn effective_host(&self) -> &str {
        match self.forwarded_host.as_deref() {
            Some(host) if !host.is_empty() => host,
            _ => &self.host,
        }
    }
}

/// Why a request could not be redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailReason {
    /// The effective host has no rule.
    UnmatchedHost,
    /// The path names a static asset that no longer exists.
    BlockedAsset,
}

impl FailReason {
    pub fn status_code(self) -> StatusCode {
        match self {
            FailReason::UnmatchedHost => StatusCode::BAD_REQUEST,
            FailReason::BlockedAsset => StatusCode::GONE,
        }
    }
}

/// The outcome of resolving one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDecision {
    Redirect { url: String, status: StatusCode },
    Fail { reason: FailReason },
}

impl RedirectDecision {
    pub fn fail(reason: FailReason) -> Self {
        RedirectDecision::Fail { reason }
    }

    /// The status code this decision is answered with.
    pub fn status(&self) -> StatusCode {
        match self {
            RedirectDecision::Redirect { status, .. } => *status,
            RedirectDecision::Fail { reason } => reason.status_code(),
        }
    }

    /// Redirect target, if any.
    pub fn location(&self) -> Option<&str> {
        match self {
            RedirectDecision::Redirect { url, .. } => Some(url),
            RedirectDecision::Fail { .. } => None,
        }
    }

    /// Short label for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            RedirectDecision::Redirect { .. } => "redirect",
            RedirectDecision::Fail { reason: FailReason::UnmatchedHost } => "unmatched_host",
            RedirectDecision::Fail { reason: FailReason::BlockedAsset } => "blocked_asset",
        }
    }
}

/// Engine switches taken from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineSettings {
    /// Redirect plain-HTTP requests to HTTPS before anything else.
    pub force_ssl: bool,
    /// Hosts containing this substring get their path locale-normalized.
    pub donation_host: Option<String>,
    /// Hosts containing this substring consult the path table first.
    pub kv_host: Option<String>,
    /// Tag host-rule redirects with `from=<effective host>`.
    pub append_from: bool,
}

impl From<&RedirectorConfig> for EngineSettings {
    fn from(config: &RedirectorConfig) -> Self {
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_lowercase)
        };
        Self {
            force_ssl: config.force_ssl,
            donation_host: non_empty(&config.donation_host),
            kv_host: non_empty(&config.kv_host),
            append_from: config.append_from,
        }
    }
}

/// Resolves requests against the host and path tables.
#[derive(Debug, Clone)]
pub struct RedirectEngine {
    settings: EngineSettings,
    hosts: Arc<HostTable>,
    paths: Arc<KvTable>,
}

impl RedirectEngine {
    pub fn new(settings: EngineSettings, hosts: Arc<HostTable>, paths: Arc<KvTable>) -> Self {
        Self {
            settings,
            hosts,
            paths,
        }
    }

    pub fn hosts(&self) -> &HostTable {
        &self.hosts
    }

    pub fn paths(&self) -> &KvTable {
        &self.paths
    }

    /// The HTTPS redirect for a plain-HTTP request, when SSL is enforced.
    ///
    /// Scheme becomes `https`; host, path and query are kept.
    pub fn ssl_redirect(&self, request: &RequestDescriptor) -> Option<RedirectDecision> {
        if !self.settings.force_ssl || request.is_secure() {
            return None;
        }

        let host = request.effective_host();
        if host.is_empty() {
            return Some(RedirectDecision::fail(FailReason::UnmatchedHost));
        }

        Some(RedirectDecision::Redirect {
            url: compose("https", host, &request.path, &request.query),
            status: StatusCode::MOVED_PERMANENTLY,
        })
    }

    /// Resolve a request into its decision.
    pub fn resolve(&self, request: &RequestDescriptor) -> RedirectDecision {
        if let Some(decision) = self.ssl_redirect(request) {
            return decision;
        }

        let host = request.effective_host();

        let donation_path;
        let path = if matches_host(host, self.settings.donation_host.as_deref()) {
            donation_path = normalize_donation_path(&request.path);
            donation_path.as_str()
        } else {
            request.path.as_str()
        };

        if is_blocked_asset(path) {
            return RedirectDecision::fail(FailReason::BlockedAsset);
        }

        if matches_host(host, self.settings.kv_host.as_deref()) {
            // Table keys are plain text; the URI path is percent-encoded.
            let decoded = percent_decode_str(path).decode_utf8_lossy();
            if let Some(hit) = self.paths.lookup(&decoded, &request.query) {
                return RedirectDecision::Redirect {
                    url: hit.target,
                    status: hit.status,
                };
            }
        }

        let Some(rule) = self.hosts.lookup(host) else {
            return RedirectDecision::fail(FailReason::UnmatchedHost);
        };

        let target = rule.parts();
        let redirect_path = if rule.preserve_path { path } else { target.path.as_str() };
        let redirect_query = if rule.preserve_query {
            reencode_query(&request.query)
        } else {
            target.query.clone()
        };

        let mut url = compose(&target.scheme, &target.authority, redirect_path, &redirect_query);
        if self.settings.append_from {
            append_from(&mut url, host);
        }

        RedirectDecision::Redirect {
            url,
            status: rule.status.status_code(),
        }
    }
}

fn append_from(url: &mut String, host: &str) {
    url.push(if url.contains('?') { '&' } else { '?' });
    url.push_str(
        &form_urlencoded::Serializer::new(String::new())
            .append_pair("from", host)
            .finish(),
    );
}

fn matches_host(host: &str, pattern: Option<&str>) -> bool {
    match pattern {
        Some(pattern) => !host.is_empty() && host.contains(pattern),
        None => false,
    }
}

fn is_blocked_asset(path: &str) -> bool {
    BLOCKED_ASSET_SUFFIXES
        .iter()
        .any(|suffix| path.ends_with(suffix))
}

/// Decode the query into its parameters and serialize them again as
/// `application/x-www-form-urlencoded`.
fn reencode_query(query: &str) -> String {
    if query.is_empty() {
        return String::new();
    }
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form_urlencoded::parse(query.as_bytes()))
        .finish()
}
