//! Request inspection.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Extract routing-relevant information (host, forwarded headers, path,
//!   query) into a `RequestDescriptor`
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Forwarded headers are trusted: the redirector always runs behind a
//!   proxy that terminates TLS
//! - Only the first value of a comma-separated forwarded header is used

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::{HeaderMap, HeaderName, HeaderValue, HOST};
use axum::http::request::Parts;
use axum::http::{Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::routing::RequestDescriptor;

pub const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");

pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// Generates a fresh UUID v4 request ID for every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Build the descriptor for a request from its URI and headers.
pub fn describe(uri: &Uri, headers: &HeaderMap) -> RequestDescriptor {
    // HTTP/2 requests carry the host in the :authority pseudo-header.
    let host = first_value(headers, &HOST)
        .or_else(|| uri.authority().map(|a| a.as_str().to_lowercase()))
        .unwrap_or_default();

    RequestDescriptor {
        host,
        forwarded_host: first_value(headers, &X_FORWARDED_HOST),
        forwarded_proto: first_value(headers, &X_FORWARDED_PROTO),
        path: uri.path().to_string(),
        query: uri.query().unwrap_or_default().to_string(),
    }
}

/// Build the descriptor for a full request.
pub fn describe_request<B>(request: &Request<B>) -> RequestDescriptor {
    describe(request.uri(), request.headers())
}

fn first_value(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    let value = headers.get(name)?.to_str().ok()?;
    let first = value.split(',').next().unwrap_or_default().trim();
    Some(first.to_lowercase())
}

impl<S> FromRequestParts<S> for RequestDescriptor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(describe(&parts.uri, &parts.headers))
    }
}
