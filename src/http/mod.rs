//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, RequestDescriptor extraction)
//!     → SSL gate (pre-routing middleware)
//!     → /robots.txt or the resolution engine
//!     → response.rs (decision → redirect / failure response)
//!     → Server header added, send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{describe, describe_request, MakeRequestUuid};
pub use response::{ROBOTS_BODY, ROBOTS_PATH};
pub use server::{AppState, HttpServer};
