//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, forwarded headers, path, query)
//!     → engine.rs (ordered guards, one decision per request)
//!         → locale.rs (donation host path rewrite)
//!         → kv_table.rs (path table, designated host only)
//!         → host_table.rs (static host rules)
//!         → url.rs (compose the final Location)
//!     → Return: Redirect or Fail
//!
//! Table Compilation (at startup):
//!     config rules  → HostTable (targets decomposed, fail fast)
//!     JSON document → KvTable (lenient, empty on error)
//!     → Freeze both behind Arc
//! ```
//!
//! # Design Decisions
//! - Tables compiled at startup, immutable at runtime
//! - No regex in hot path (exact host lookup, substring for special hosts)
//! - Deterministic: same input always yields the same decision

pub mod engine;
pub mod host_table;
pub mod kv_table;
pub mod locale;
pub mod url;

pub use engine::{EngineSettings, FailReason, RedirectDecision, RedirectEngine, RequestDescriptor};
pub use host_table::{HostRule, HostTable, RedirectStatus};
pub use kv_table::{KvEntry, KvMatch, KvTable};
