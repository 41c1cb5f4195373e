//! Shutdown signal shared between the relay and its long-running tasks.

use tokio::sync::watch;

/// One-shot shutdown signal.
///
/// Long-running tasks subscribe and select on the receiver; `trigger` flips
/// the value once and is idempotent.
#[derive(Debug)]
pub struct ShutdownSignal {
    tx: watch::Sender<bool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Subscribe to the signal. `changed()` on the receiver resolves once
    /// shutdown has been triggered.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Raise the signal. Safe to call more than once.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }

    /// Whether shutdown has been triggered.
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_observe_trigger() {
        let signal = ShutdownSignal::new();
        let mut rx = signal.subscribe();

        assert!(!signal.is_triggered());
        signal.trigger();
        assert!(signal.is_triggered());

        rx.changed().await.unwrap();
        assert!(*rx.borrow());
    }

    #[tokio::test]
    async fn late_subscriber_sees_triggered_state() {
        let signal = ShutdownSignal::new();
        signal.trigger();
        assert!(*signal.subscribe().borrow());
    }
}
