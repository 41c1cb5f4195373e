//! The relay instance: listener ownership, accept loop, admission control
//! and the graceful-shutdown drain.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::RelayConfig;
use crate::lifecycle::ShutdownSignal;
use crate::net::connection::ConnectionGuard;
use crate::net::listener::{Listener, ListenerError};
use crate::relay::handler::handle_connection;
use crate::stats::{RelayStats, StatsSnapshot};

/// Error type for relay startup.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Listen(#[from] ListenerError),
    #[error("relay already started")]
    AlreadyStarted,
}

/// A running TCP relay service.
///
/// Owns the statistics registry, the shutdown signal and the drain channel;
/// the listener itself is owned by the accept-loop task once started. One
/// relay owns at most one listener over its lifetime.
pub struct Relay {
    config: Arc<RelayConfig>,
    stats: Arc<RelayStats>,
    shutdown: ShutdownSignal,
    started: AtomicBool,
    /// Kept open while the relay runs; every accept loop and handler holds
    /// a clone. Dropped by `shutdown` to arm the drain wait.
    drain_tx: Mutex<Option<mpsc::Sender<()>>>,
    drain_rx: Mutex<Option<mpsc::Receiver<()>>>,
}

impl Relay {
    /// Create a relay from a validated configuration.
    pub fn new(config: RelayConfig) -> Self {
        let (drain_tx, drain_rx) = mpsc::channel(1);
        Self {
            config: Arc::new(config),
            stats: Arc::new(RelayStats::new()),
            shutdown: ShutdownSignal::new(),
            started: AtomicBool::new(false),
            drain_tx: Mutex::new(Some(drain_tx)),
            drain_rx: Mutex::new(Some(drain_rx)),
        }
    }

    /// Bind the listener and start accepting connections.
    ///
    /// Returns the bound local address once the relay is listening. Bind
    /// failure is the only fatal error in the service; the accept loop runs
    /// in the background after this returns.
    pub async fn start(&self) -> Result<SocketAddr, RelayError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(RelayError::AlreadyStarted);
        }

        let listener = match Listener::bind(&self.config).await {
            Ok(listener) => listener,
            Err(e) => {
                self.started.store(false, Ordering::SeqCst);
                return Err(e.into());
            }
        };
        let local_addr = listener.local_addr().map_err(ListenerError::Bind)?;

        tracing::info!(
            listen_addr = %local_addr,
            target_addr = %self.config.target_address(),
            max_conns = self.config.max_conns,
            "relay started"
        );

        let drain_tx = self
            .drain_tx
            .lock()
            .expect("drain sender lock poisoned")
            .clone()
            .ok_or(RelayError::AlreadyStarted)?;

        tokio::spawn(accept_loop(
            listener,
            Arc::clone(&self.config),
            Arc::clone(&self.stats),
            self.shutdown.subscribe(),
            drain_tx,
        ));

        Ok(local_addr)
    }

    /// Gracefully stop the relay.
    ///
    /// Signals the accept loop to stop (which closes the listener), then
    /// waits up to `grace` for in-flight connections to finish. On timeout
    /// the remaining connections are left running; they are never
    /// force-closed here.
    pub async fn shutdown(&self, grace: Duration) {
        tracing::info!(grace_secs = grace.as_secs_f64(), "shutdown initiated");

        self.shutdown.trigger();

        // Drop our own drain handle so recv() returns None once the accept
        // loop and every handler have dropped theirs.
        drop(self.drain_tx.lock().expect("drain sender lock poisoned").take());
        let drain_rx = self.drain_rx.lock().expect("drain receiver lock poisoned").take();

        if let Some(mut drain_rx) = drain_rx {
            match tokio::time::timeout(grace, drain_rx.recv()).await {
                Ok(_) => tracing::info!("all connections closed gracefully"),
                Err(_) => tracing::warn!(
                    active_conns = self.stats.active_conns(),
                    "shutdown grace period elapsed with connections still active"
                ),
            }
        }

        let snapshot = self.stats.snapshot();
        tracing::info!(
            total_conns = snapshot.total_conns,
            bytes_rx = snapshot.bytes_rx,
            bytes_tx = snapshot.bytes_tx,
            "shutdown complete"
        );
    }

    /// Immutable snapshot of the relay counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

/// Sequential accept loop with admit-or-drop admission control.
///
/// Runs until the shutdown signal fires; exiting drops (closes) the
/// listener, exactly once.
async fn accept_loop(
    listener: Listener,
    config: Arc<RelayConfig>,
    stats: Arc<RelayStats>,
    mut shutdown: tokio::sync::watch::Receiver<bool>,
    drain_tx: mpsc::Sender<()>,
) {
    loop {
        let (client, client_addr) = tokio::select! {
            _ = shutdown.changed() => break,
            accepted = listener.accept() => match accepted {
                Ok(pair) => pair,
                Err(e) => {
                    // Transient accept failure; the service keeps running.
                    tracing::error!(error = %e, "accept failed");
                    continue;
                }
            },
        };

        let active = stats.active_conns();
        if active >= config.max_conns {
            tracing::warn!(
                active_conns = active,
                max_conns = config.max_conns,
                remote_addr = %client_addr,
                "connection limit reached, rejecting"
            );
            // Dropping the stream closes it; no counters are touched.
            continue;
        }

        // Admit inside the accept task: the check above and this increment
        // are sequential with respect to every other admission decision.
        let guard = ConnectionGuard::admit(Arc::clone(&stats), drain_tx.clone());
        tokio::spawn(handle_connection(
            Arc::clone(&config),
            Arc::clone(&stats),
            guard,
            client,
            client_addr,
        ));
    }
}
