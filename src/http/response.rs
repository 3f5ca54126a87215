//! Response emission.
//!
//! # Responsibilities
//! - Turn a redirect decision into an HTTP response
//! - Serve the fixed robots policy
//!
//! # Design Decisions
//! - Redirects and failures have empty bodies
//! - The `Server` header is added by a layer in `server.rs`, so it lands on
//!   every response including timeouts

use axum::http::header::{HeaderValue, CONTENT_TYPE, LOCATION};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::routing::RedirectDecision;

/// Path of the fixed robots route.
pub const ROBOTS_PATH: &str = "/robots.txt";

/// Body served on the robots route: crawlers should not index anything.
pub const ROBOTS_BODY: &str = "User-agent: *\nDisallow: /";

impl IntoResponse for RedirectDecision {
    fn into_response(self) -> Response {
        match self {
            RedirectDecision::Redirect { url, status } => match HeaderValue::from_str(&url) {
                Ok(location) => (status, [(LOCATION, location)]).into_response(),
                Err(e) => {
                    tracing::error!(url = %url, error = %e, "Redirect target is not a valid header value");
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            },
            RedirectDecision::Fail { reason } => reason.status_code().into_response(),
        }
    }
}

/// `GET /robots.txt`
pub async fn robots_txt() -> impl IntoResponse {
    (
        [(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"))],
        ROBOTS_BODY,
    )
}
