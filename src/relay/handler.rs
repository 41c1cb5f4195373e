//! Per-connection handler: dial the target, relay bytes both ways, close.
//!
//! # Lifecycle
//! 1. Compute the connection's absolute deadline (if configured)
//! 2. Dial the target with a bounded connect timeout
//! 3. Run two copy pumps (client→target, target→client), each reporting
//!    through a two-slot completion channel
//! 4. On the first completion, raise the close signal; both pumps exit and
//!    drop their socket halves, fully closing both sockets
//! 5. Await the second completion, fold byte counts into the stats, log
//!
//! All failures here are connection-local: logged, never escalated, never
//! retried.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::config::RelayConfig;
use crate::net::connection::ConnectionGuard;
use crate::stats::RelayStats;

const COPY_BUF_SIZE: usize = 16 * 1024;

/// Which way a copy pump moves bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// client → target; counted as received bytes.
    ClientToTarget,
    /// target → client; counted as sent bytes.
    TargetToClient,
}

/// Completion report from one copy pump.
struct CopyDone {
    direction: Direction,
    bytes: u64,
    error: Option<io::Error>,
}

/// Drive one admitted client connection through its full lifecycle.
///
/// The guard was created at admission; it releases the connection slot and
/// the drain handle when this function returns, on every path.
pub(crate) async fn handle_connection(
    config: Arc<RelayConfig>,
    stats: Arc<RelayStats>,
    guard: ConnectionGuard,
    client: TcpStream,
    client_addr: SocketAddr,
) {
    let conn_id = guard.id();
    tracing::info!(conn_id = %conn_id, client_addr = %client_addr, "connection accepted");

    // One-shot absolute deadline: a cap on total connection lifetime, set
    // once here and never refreshed on activity.
    let deadline = config.idle_timeout().map(|t| Instant::now() + t);

    let target_addr = config.target_address();
    let target = match dial_target(&target_addr, config.connect_timeout()).await {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!(
                conn_id = %conn_id,
                target_addr = %target_addr,
                error = %e,
                "failed to connect to target"
            );
            return;
        }
    };

    tracing::info!(conn_id = %conn_id, target_addr = %target_addr, "connected to target");

    let (client_read, client_write) = client.into_split();
    let (target_read, target_write) = target.into_split();

    // Two-slot channel: neither completion report can be lost, whichever
    // direction finishes first.
    let (done_tx, mut done_rx) = mpsc::channel::<CopyDone>(2);
    let (close_tx, close_rx) = watch::channel(false);

    tokio::spawn(copy_pump(
        Direction::ClientToTarget,
        client_read,
        target_write,
        deadline,
        close_rx.clone(),
        done_tx.clone(),
    ));
    tokio::spawn(copy_pump(
        Direction::TargetToClient,
        target_read,
        client_write,
        deadline,
        close_rx,
        done_tx,
    ));

    // Wait for whichever direction ends first, then tear down the session
    // so the opposite pump's blocked read returns.
    let first = done_rx.recv().await;
    let _ = close_tx.send(true);
    let second = done_rx.recv().await;

    let mut bytes_rx = 0;
    let mut bytes_tx = 0;
    let mut close_error = None;
    for done in [first, second].into_iter().flatten() {
        match done.direction {
            Direction::ClientToTarget => bytes_rx = done.bytes,
            Direction::TargetToClient => bytes_tx = done.bytes,
        }
        if close_error.is_none() {
            close_error = done.error;
        }
    }

    stats.record_bytes(bytes_rx, bytes_tx);

    match close_error {
        Some(e) => tracing::info!(
            conn_id = %conn_id,
            bytes_rx,
            bytes_tx,
            error = %e,
            "connection closed"
        ),
        None => tracing::info!(conn_id = %conn_id, bytes_rx, bytes_tx, "connection closed"),
    }
}

/// Dial the target, bounded by the connect timeout when one is configured.
async fn dial_target(addr: &str, timeout: Option<Duration>) -> io::Result<TcpStream> {
    match timeout {
        Some(t) => tokio::time::timeout(t, TcpStream::connect(addr))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "connect timed out"))?,
        None => TcpStream::connect(addr).await,
    }
}

/// Copy bytes one way until EOF, error, deadline, or the close signal.
///
/// Exiting drops the read and write halves; once both pumps have exited,
/// all four halves are gone and both sockets are fully closed.
async fn copy_pump(
    direction: Direction,
    mut read: OwnedReadHalf,
    mut write: OwnedWriteHalf,
    deadline: Option<Instant>,
    mut close: watch::Receiver<bool>,
    done: mpsc::Sender<CopyDone>,
) {
    let mut buf = vec![0u8; COPY_BUF_SIZE];
    let mut bytes = 0u64;
    let error = loop {
        let n = tokio::select! {
            _ = close.changed() => break None,
            res = with_deadline(deadline, read.read(&mut buf)) => match res {
                Ok(0) => break None,
                Ok(n) => n,
                Err(e) => break Some(e),
            },
        };
        let write_res = tokio::select! {
            _ = close.changed() => break None,
            res = with_deadline(deadline, write.write_all(&buf[..n])) => res,
        };
        if let Err(e) = write_res {
            break Some(e);
        }
        bytes += n as u64;
    };

    // The handler always drains both slots, but it may already be gone if
    // the process is exiting; a failed send is fine.
    let _ = done
        .send(CopyDone {
            direction,
            bytes,
            error,
        })
        .await;
}

/// Bound an I/O future by the connection's absolute deadline.
async fn with_deadline<T>(
    deadline: Option<Instant>,
    io: impl std::future::Future<Output = io::Result<T>>,
) -> io::Result<T> {
    match deadline {
        Some(at) => tokio::time::timeout_at(at, io)
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "connection deadline exceeded"))?,
        None => io.await,
    }
}
