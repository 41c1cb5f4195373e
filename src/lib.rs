//! GateRelay — transparent TCP relay service.
//!
//! Accepts client connections, dials a fixed target per connection and
//! copies bytes both ways until either side closes, under a global
//! connection cap, per-connection timeouts and a graceful-shutdown drain.

pub mod config;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod relay;
pub mod stats;

pub use config::RelayConfig;
pub use relay::{Relay, RelayError};
pub use stats::StatsSnapshot;
