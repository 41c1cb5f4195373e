//! Structured logging setup.
//!
//! # Design Decisions
//! - Uses the tracing crate for leveled key/value events
//! - Base level comes from the config; `RUST_LOG` overrides it for
//!   ad-hoc debugging

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// `level` is the validated `log_level` from the configuration.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gaterelay={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
