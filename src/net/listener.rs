//! TCP listener wrapper.
//!
//! # Responsibilities
//! - Bind to the configured listen address
//! - Accept incoming TCP connections one at a time
//! - Distinguish fatal bind errors from transient accept errors
//!
//! The connection ceiling is not enforced here: admission is an
//! admit-or-drop decision made by the relay's accept loop, so this stays a
//! thin wrapper around the socket.

use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpStream};

use crate::config::RelayConfig;

/// Error type for listener operations.
#[derive(Debug)]
pub enum ListenerError {
    /// Failed to bind to the listen address. Fatal at startup.
    Bind(std::io::Error),
    /// Failed to accept a connection. Transient; the accept loop continues.
    Accept(std::io::Error),
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::Bind(e) => write!(f, "failed to bind: {}", e),
            ListenerError::Accept(e) => write!(f, "failed to accept: {}", e),
        }
    }
}

impl std::error::Error for ListenerError {}

/// The relay's listening socket.
///
/// Owned by the accept loop and dropped (closed) exactly once, when the
/// loop exits on shutdown.
pub struct Listener {
    inner: TcpListener,
}

impl Listener {
    /// Bind to the address configured in `listen_addr`/`listen_port`.
    pub async fn bind(config: &RelayConfig) -> Result<Self, ListenerError> {
        let listener = TcpListener::bind(config.listen_address())
            .await
            .map_err(ListenerError::Bind)?;

        let local_addr = listener.local_addr().map_err(ListenerError::Bind)?;

        tracing::debug!(address = %local_addr, "listener bound");

        Ok(Self { inner: listener })
    }

    /// Accept the next connection, yielding the stream and peer address.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr), ListenerError> {
        self.inner.accept().await.map_err(ListenerError::Accept)
    }

    /// The local address this listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.inner.local_addr()
    }
}
