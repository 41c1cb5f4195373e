//! Connection identity and lifetime tracking.
//!
//! # Responsibilities
//! - Assign monotonic per-relay connection ids
//! - Tie an admitted connection's slot to a guard object so the active
//!   count is released on every handler exit path
//! - Keep the shutdown drain channel open while the connection is in flight

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::stats::RelayStats;

/// Unique identifier for a connection within one relay instance.
///
/// Ids are assigned from the relay's total-connection counter, so they are
/// monotonic per relay rather than process-global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Guard representing one admitted connection.
///
/// Creation bumps the active and total counters; dropping releases the
/// active slot and closes this connection's handle on the drain channel,
/// letting a draining shutdown observe completion. Held by the connection
/// handler for its entire lifetime.
#[derive(Debug)]
pub struct ConnectionGuard {
    stats: Arc<RelayStats>,
    id: ConnectionId,
    _drain: mpsc::Sender<()>,
}

impl ConnectionGuard {
    /// Admit a connection: increment the active count, then the total
    /// count, and take the new total as the connection id.
    ///
    /// Must be called from the accept task, after the admission check and
    /// before the handler is spawned, so the check/increment pair never
    /// interleaves with another admission decision.
    pub fn admit(stats: Arc<RelayStats>, drain: mpsc::Sender<()>) -> Self {
        let id = ConnectionId(stats.record_admitted());
        Self {
            stats,
            id,
            _drain: drain,
        }
    }

    /// This connection's id.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.stats.record_closed();
        tracing::trace!(conn_id = %self.id, "connection slot released");
    }
}
