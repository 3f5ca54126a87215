//! Host-based HTTP redirector library.
//!
//! Resolves each request's effective host (and path) against static host
//! rules and a path redirect table, then answers with a redirect or a
//! terminal failure status.

// Core subsystems
pub mod config;
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::RedirectorConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{RedirectDecision, RedirectEngine, RequestDescriptor};
