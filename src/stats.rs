//! Relay statistics registry.
//!
//! # Responsibilities
//! - Track active and total connection counts
//! - Accumulate bytes relayed in each direction
//! - Provide read-only snapshots for logging and callers
//!
//! # Design Decisions
//! - Counters are owned by one `Relay` instance, never process-global, so
//!   independent relays (e.g. in tests) cannot cross-contaminate
//! - Every mutation is a single atomic add; no locks, no read-modify-write
//! - Total connections doubles as the connection-id sequence

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Atomically-updated counters for one relay instance.
///
/// `bytes_rx` counts client→target traffic, `bytes_tx` target→client.
#[derive(Debug, Default)]
pub struct RelayStats {
    active_conns: AtomicU64,
    total_conns: AtomicU64,
    bytes_rx: AtomicU64,
    bytes_tx: AtomicU64,
}

impl RelayStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current number of in-flight connections.
    pub fn active_conns(&self) -> u64 {
        self.active_conns.load(Ordering::SeqCst)
    }

    /// Record an admitted connection: bumps the active count and the total
    /// count, returning the new total, which serves as the connection id.
    ///
    /// Rejected connections must never reach this.
    pub(crate) fn record_admitted(&self) -> u64 {
        self.active_conns.fetch_add(1, Ordering::SeqCst);
        self.total_conns.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Release an admitted connection's slot.
    pub(crate) fn record_closed(&self) {
        self.active_conns.fetch_sub(1, Ordering::SeqCst);
    }

    /// Fold one finished connection's byte counts into the cumulative totals.
    pub(crate) fn record_bytes(&self, rx: u64, tx: u64) {
        self.bytes_rx.fetch_add(rx, Ordering::SeqCst);
        self.bytes_tx.fetch_add(tx, Ordering::SeqCst);
    }

    /// Take an immutable snapshot of all four counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            active_conns: self.active_conns.load(Ordering::SeqCst),
            total_conns: self.total_conns.load(Ordering::SeqCst),
            bytes_rx: self.bytes_rx.load(Ordering::SeqCst),
            bytes_tx: self.bytes_tx.load(Ordering::SeqCst),
        }
    }
}

/// Point-in-time view of the relay counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Connections currently being relayed.
    pub active_conns: u64,
    /// Connections admitted since startup.
    pub total_conns: u64,
    /// Cumulative bytes copied client→target.
    pub bytes_rx: u64,
    /// Cumulative bytes copied target→client.
    pub bytes_tx: u64,
}
