//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     load config → init logging → Relay::start (bind, accept)
//!
//! Shutdown:
//!     SIGINT/SIGTERM (signals.rs)
//!     → ShutdownSignal (shutdown.rs) raised
//!     → accept loop exits, listener closes
//!     → bounded drain of in-flight connections
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::ShutdownSignal;
