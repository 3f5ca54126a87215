//! Destination URL decomposition and composition.
//!
//! # Design Decisions
//! - Plain string splitting instead of a full URL parser: a parser would
//!   normalize (`https://a.org` becomes `https://a.org/`) and break the
//!   `compose(decompose(u)) == u` round trip redirect targets rely on
//! - Query strings are carried verbatim; encoding is the caller's concern
//! - Fragments are dropped, they never reach the server anyway

use thiserror::Error;

/// Errors produced while decomposing a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    /// The input is not an absolute `scheme://authority` URL.
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: &'static str },
}

/// The four components of an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts {
    pub scheme: String,
    pub authority: String,
    /// Path including its leading slash, empty when the URL has none.
    pub path: String,
    /// Query without the leading `?`, empty when absent.
    pub query: String,
}

impl UrlParts {
    /// Reassemble these parts into a URL.
    pub fn to_url(&self) -> String {
        compose(&self.scheme, &self.authority, &self.path, &self.query)
    }
}

/// Split an absolute URL into scheme, authority, path and query.
pub fn decompose(url: &str) -> Result<UrlParts, UrlError> {
    let invalid = |reason| UrlError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let (scheme, rest) = url.split_once("://").ok_or_else(|| invalid("missing scheme"))?;
    if scheme.is_empty()
        || !scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        || !scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        return Err(invalid("missing scheme"));
    }

    // Fragment never takes part in a redirect target.
    let rest = rest.split_once('#').map_or(rest, |(before, _)| before);

    let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
    let (authority, rest) = rest.split_at(authority_end);
    if authority.is_empty() {
        return Err(invalid("missing authority"));
    }

    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, query),
        None => (rest, ""),
    };

    Ok(UrlParts {
        scheme: scheme.to_string(),
        authority: authority.to_string(),
        path: path.to_string(),
        query: query.to_string(),
    })
}

/// Build `scheme://authority{path}[?query]`.
///
/// `query` must already be percent-encoded; it is inserted as-is.
pub fn compose(scheme: &str, authority: &str, path: &str, query: &str) -> String {
    let mut url = String::with_capacity(
        scheme.len() + authority.len() + path.len() + query.len() + 4,
    );
    url.push_str(scheme);
    url.push_str("://");
    url.push_str(authority);
    url.push_str(path);
    if !query.is_empty() {
        url.push('?');
        url.push_str(query);
    }
    url
}
