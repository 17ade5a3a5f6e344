//! Cooperative cancellation for scheduled cycles.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::info;

/// Shared flag that tears down a running cycle.
///
/// Clones observe the same flag. Once triggered it stays triggered.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    /// A signal that fires on Ctrl-C.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn ctrl_c() -> Self {
        let signal = Self::new();
        let trigger = signal.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown requested");
                trigger.trigger();
            }
        });
        signal
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Sleep until `duration` from now has passed.
    ///
    /// Returns `false` if the signal fired first.
    pub async fn sleep(&self, duration: Duration) -> bool {
        self.sleep_until(Instant::now() + duration).await
    }

    /// Sleep until `deadline`. Returns `false` if the signal fired first.
    pub async fn sleep_until(&self, deadline: Instant) -> bool {
        let mut rx = self.rx.clone();
        tokio::select! {
            biased;
            _ = rx.wait_for(|triggered| *triggered) => false,
            _ = tokio::time::sleep_until(deadline) => true,
        }
    }

    /// Resolve once the signal fires.
    pub async fn triggered(&self) {
        let mut rx = self.rx.clone();
        let _ = rx.wait_for(|triggered| *triggered).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
