//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind, sequential accept)
//!     → relay accept loop (admission check)
//!     → connection.rs (id assignment, slot guard)
//!     → hand off to the connection handler
//! ```
//!
//! # Design Decisions
//! - The listener stays a thin accept wrapper; admission is admit-or-drop
//!   and lives with the relay's accept loop
//! - Every admitted connection is tracked by a guard so shutdown can drain

pub mod connection;
pub mod listener;
