//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (SSL gate, tracing, timeout, request ID, Server header)
//! - Bind server to listener
//! - Dispatch requests to the resolution engine
//! - Observability (metrics, correlation IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RedirectorConfig;
use crate::http::request::{describe_request, MakeRequestUuid};
use crate::http::response::{robots_txt, ROBOTS_PATH};
use crate::observability::metrics;
use crate::routing::{RedirectEngine, RequestDescriptor};

const DEFAULT_SERVER_HEADER: &str = "host-redirector";

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: Arc<RedirectEngine>,
}

/// HTTP server for the redirector.
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server serving `engine` decisions.
    pub fn new(config: RedirectorConfig, engine: RedirectEngine) -> Self {
        let state = AppState {
            engine: Arc::new(engine),
        };
        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RedirectorConfig, state: AppState) -> Router {
        let server_header = HeaderValue::from_str(&config.server_header).unwrap_or_else(|_| {
            tracing::warn!(
                server_header = %config.server_header,
                "Invalid Server header value, using default"
            );
            HeaderValue::from_static(DEFAULT_SERVER_HEADER)
        });

        Router::new()
            .route(ROBOTS_PATH, get(robots_txt).fallback(redirect_handler))
            .fallback(redirect_handler)
            .layer(middleware::from_fn_with_state(state.clone(), enforce_ssl))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(SetResponseHeaderLayer::overriding(header::SERVER, server_header))
    }

    /// The fully layered router, e.g. for driving it without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Redirect plain-HTTP requests before any route runs, robots included.
async fn enforce_ssl(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let descriptor = describe_request(&request);
    match state.engine.ssl_redirect(&descriptor) {
        Some(decision) => {
            tracing::debug!(
                host = %descriptor.effective_host(),
                path = %descriptor.path,
                "Enforcing HTTPS"
            );
            decision.into_response()
        }
        None => next.run(request).await,
    }
}

/// Resolve every non-fixed route through the engine.
async fn redirect_handler(
    State(state): State<AppState>,
    method: Method,
    descriptor: RequestDescriptor,
) -> Response {
    let start = Instant::now();
    let decision = state.engine.resolve(&descriptor);
    let status = decision.status();

    match decision.location() {
        Some(location) => tracing::debug!(
            method = %method,
            host = %descriptor.effective_host(),
            path = %descriptor.path,
            location = %location,
            status = status.as_u16(),
            "Redirecting"
        ),
        None => tracing::info!(
            method = %method,
            host = %descriptor.effective_host(),
            path = %descriptor.path,
            outcome = decision.outcome(),
            status = status.as_u16(),
            "Request not redirected"
        ),
    }

    metrics::record_decision(decision.outcome(), status, start);
    decision.into_response()
}
