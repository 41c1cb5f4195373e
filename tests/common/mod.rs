//! Shared utilities for relay integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use gaterelay::{Relay, RelayConfig};

/// Start a mock target that echoes every byte back to the relay.
pub async fn start_echo_target() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        loop {
                            match socket.read(&mut buf).await {
                                Ok(0) | Err(_) => break,
                                Ok(n) => {
                                    if socket.write_all(&buf[..n]).await.is_err() {
                                        break;
                                    }
                                }
                            }
                        }
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Events reported by the blackhole target.
#[derive(Debug, PartialEq, Eq)]
pub enum TargetEvent {
    /// The relay dialed us.
    Accepted,
    /// Our blocked read returned, i.e. the relay closed the socket.
    Closed,
}

/// Start a mock target that accepts, then blocks on read until its socket
/// is closed from the relay side, reporting both events.
pub async fn start_blackhole_target() -> (SocketAddr, mpsc::UnboundedReceiver<TargetEvent>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let event_tx = event_tx.clone();
                    tokio::spawn(async move {
                        let _ = event_tx.send(TargetEvent::Accepted);
                        let mut buf = [0u8; 4096];
                        loop {
                            match socket.read(&mut buf).await {
                                Ok(0) | Err(_) => break,
                                Ok(_) => continue,
                            }
                        }
                        let _ = event_tx.send(TargetEvent::Closed);
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, event_rx)
}

/// An address that refuses connections: bound, observed, then released.
pub async fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Build a relay config pointing at `target`, listening on an OS-assigned
/// loopback port.
pub fn test_config(target: SocketAddr) -> RelayConfig {
    RelayConfig {
        listen_addr: "127.0.0.1".to_string(),
        listen_port: 0,
        target_addr: target.ip().to_string(),
        target_port: target.port(),
        max_conns: 16,
        idle_timeout_secs: 0,
        connect_timeout_secs: 2,
        shutdown_grace_secs: 5,
        log_level: "debug".to_string(),
    }
}

/// Start a relay and return it with its bound address.
pub async fn start_relay(config: RelayConfig) -> (Arc<Relay>, SocketAddr) {
    let relay = Arc::new(Relay::new(config));
    let addr = relay.start().await.expect("relay failed to start");
    (relay, addr)
}

/// Poll `condition` every 10ms until it holds, panicking after `limit`.
pub async fn wait_until(limit: Duration, mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + limit;
    while !condition() {
        if tokio::time::Instant::now() >= deadline {
            panic!("condition not met within {:?}", limit);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
