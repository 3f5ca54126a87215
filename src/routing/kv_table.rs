//! Dynamic path-redirect table.
//!
//! # Responsibilities
//! - Load the path → destination mapping from a JSON document
//! - Resolve a request path (and query) against it, tolerating a trailing
//!   slash mismatch
//!
//! # Design Decisions
//! - Loading is lenient: a missing or malformed document yields an empty
//!   table and a warning, never a startup failure
//! - Immutable once built; shared through `Arc`

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// One destination in the table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KvEntry {
    /// Absolute URL to redirect to.
    pub redirect_to: String,

    /// 301 when set, 302 otherwise.
    #[serde(default)]
    pub is_permanent: bool,
}

impl KvEntry {
    /// Status code issued for this entry.
    pub fn status(&self) -> StatusCode {
        if self.is_permanent {
            StatusCode::MOVED_PERMANENTLY
        } else {
            StatusCode::FOUND
        }
    }
}

/// A successful table lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvMatch {
    pub target: String,
    pub status: StatusCode,
}

/// Path-keyed redirect table.
#[derive(Debug, Clone, Default)]
pub struct KvTable {
    entries: HashMap<String, KvEntry>,
}

impl KvTable {
    /// Build a table from `(key, entry)` pairs.
    ///
    /// Keys that do not start with `/` can never match a request path and are
    /// skipped.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, KvEntry)>,
    {
        let entries = entries
            .into_iter()
            .filter(|(key, _)| {
                if key.starts_with('/') {
                    true
                } else {
                    tracing::warn!(key = %key, "Skipping redirect table key without leading slash");
                    false
                }
            })
            .collect();
        Self { entries }
    }

    /// Parse a table from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: HashMap<String, KvEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    /// Load the table from disk, falling back to an empty table on any error.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Redirect table unreadable, starting empty");
                return Self::default();
            }
        };

        match Self::from_json(&content) {
            Ok(table) => {
                tracing::info!(path = %path.display(), entries = table.len(), "Redirect table loaded");
                table
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Redirect table malformed, starting empty");
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve `path` (leading slash included) and the raw `query`.
    ///
    /// Query-qualified keys are tried before bare paths, and each form is
    /// tried as-is before its trailing-slash toggled twin.
    pub fn lookup(&self, path: &str, query: &str) -> Option<KvMatch> {
        let toggled = toggle_trailing_slash(path);

        if !query.is_empty() {
            let with_query = [Some(path), toggled.as_deref()]
                .into_iter()
                .flatten()
                .map(|p| format!("{p}?{query}"));
            for key in with_query {
                if let Some(entry) = self.entries.get(&key) {
                    return Some(KvMatch {
                        target: entry.redirect_to.clone(),
                        status: entry.status(),
                    });
                }
            }
        }

        let entry = [Some(path), toggled.as_deref()]
            .into_iter()
            .flatten()
            .find_map(|key| self.entries.get(key))?;

        Some(KvMatch {
            target: append_query(&entry.redirect_to, query),
            status: entry.status(),
        })
    }
}

/// Add a trailing slash if absent, strip it if present.
///
/// Returns `None` when stripping would leave nothing (the root path).
fn toggle_trailing_slash(path: &str) -> Option<String> {
    match path.strip_suffix('/') {
        Some("") => None,
        Some(stripped) => Some(stripped.to_string()),
        None => Some(format!("{path}/")),
    }
}

fn append_query(target: &str, query: &str) -> String {
    if query.is_empty() {
        target.to_string()
    } else if target.contains('?') {
        format!("{target}&{query}")
    } else {
        format!("{target}?{query}")
    }
}
