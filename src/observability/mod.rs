//! Observability subsystem.
//!
//! Structured, leveled log events with key/value fields are the relay's
//! only observability surface; the event set (accepted, rejected,
//! connected-to-target, dial failure, closed, shutdown phases) is stable
//! so downstream log tooling can rely on it.

pub mod logging;
