//! OS signal handling.
//!
//! # Responsibilities
//! - Register handlers for SIGINT and SIGTERM
//! - Translate them to [`Signal`] values on the shutdown channel
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Handlers are registered before the first tick; registration failure is fatal
//! - Only Ctrl-C is available on non-Unix platforms

use std::fmt;

use tokio::task::JoinHandle;

use crate::lifecycle::shutdown::ShutdownTrigger;

/// Termination signals the prober reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// SIGINT / Ctrl-C.
    Interrupt,
    /// SIGTERM.
    Terminate,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Signal::Interrupt => "interrupt",
            Signal::Terminate => "terminated",
        })
    }
}

/// Register the handlers and spawn a task forwarding every received signal
/// to `trigger`. The task ends once the listener side is dropped.
#[cfg(unix)]
pub fn spawn_listener(trigger: ShutdownTrigger) -> std::io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(tokio::spawn(async move {
        loop {
            let received = tokio::select! {
                Some(()) = interrupt.recv() => Signal::Interrupt,
                Some(()) = terminate.recv() => Signal::Terminate,
                else => break,
            };
            tracing::debug!(signal = %received, "Signal caught");
            if !trigger.trigger(received) {
                break;
            }
        }
    }))
}

#[cfg(not(unix))]
pub fn spawn_listener(trigger: ShutdownTrigger) -> std::io::Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if !trigger.trigger(Signal::Interrupt) {
                break;
            }
        }
    }))
}
