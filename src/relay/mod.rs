//! Relay core subsystem.
//!
//! # Data Flow
//! ```text
//! listener accept
//!     → service.rs (accept loop, admission check against max_conns)
//!     → handler.rs (dial target, two copy pumps, teardown)
//!     → stats registry (byte counts folded in on completion)
//!
//! shutdown(grace):
//!     trigger signal → accept loop exits, listener closes
//!     → counted drain wait, bounded by grace
//! ```
//!
//! # Design Decisions
//! - Admission is a soft limit: admit or drop, no queueing, no backoff
//! - One task per connection plus two copy pumps; concurrency is bounded
//!   only by admission, never by a worker pool
//! - Connection failures stay local: nothing a handler does can take down
//!   the accept loop or another connection
//! - Shutdown drain is best-effort; lingering connections are left running

pub mod handler;
pub mod service;

pub use service::{Relay, RelayError};
