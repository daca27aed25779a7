//! Shutdown coordination for the prober.

use tokio::sync::mpsc;

use crate::lifecycle::signals::Signal;

/// Create a connected trigger/listener pair.
pub fn channel() -> (ShutdownTrigger, ShutdownListener) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ShutdownTrigger { tx }, ShutdownListener { rx })
}

/// Sending half. Cloneable; held by the signal listener task (and tests).
#[derive(Debug, Clone)]
pub struct ShutdownTrigger {
    tx: mpsc::UnboundedSender<Signal>,
}

impl ShutdownTrigger {
    /// Request shutdown. Returns `false` once the listener is gone.
    pub fn trigger(&self, signal: Signal) -> bool {
        self.tx.send(signal).is_ok()
    }
}

/// Receiving half, owned by the lifecycle controller.
#[derive(Debug)]
pub struct ShutdownListener {
    rx: mpsc::UnboundedReceiver<Signal>,
}

impl ShutdownListener {
    /// Wait for the next shutdown request. Pends forever once every
    /// trigger has been dropped. Cancel safe.
    pub async fn recv(&mut self) -> Signal {
        match self.rx.recv().await {
            Some(signal) => signal,
            None => std::future::pending().await,
        }
    }
}
