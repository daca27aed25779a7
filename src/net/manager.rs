//! Connection lifecycle management.
//!
//! # Responsibilities
//! - Own the single logical connection handle
//! - Recreate it before every tick (reconnect) or only when absent (persistent)
//! - Close replaced handles without letting close errors escape

use super::{Connection, Connector};

/// How the manager treats an existing handle when a tick asks for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectStrategy {
    /// Open once, reuse for every tick until the process exits.
    Persistent,
    /// Close and reopen before every tick.
    Reconnect,
}

impl ConnectStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectStrategy::Persistent => "persistent",
            ConnectStrategy::Reconnect => "reconnect",
        }
    }
}

/// Exclusive owner of the current connection handle.
pub struct ConnectionManager<C: Connector> {
    connector: C,
    current: Option<C::Connection>,
    opened: u64,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            current: None,
            opened: 0,
        }
    }

    /// Return a live handle, opening a new one when `strategy` demands it or
    /// none exists yet. A handle whose last probe failed is still reused in
    /// persistent mode.
    pub async fn ensure_connection(&mut self, strategy: ConnectStrategy) -> &C::Connection {
        if strategy == ConnectStrategy::Reconnect {
            if let Some(old) = self.current.take() {
                close_quietly(old).await;
            }
        }

        let connector = &self.connector;
        let opened = &mut self.opened;
        self.current.get_or_insert_with(|| {
            *opened += 1;
            tracing::debug!(opened = *opened, "Opening connection handle");
            connector.open()
        })
    }

    /// The handle most recently returned by [`ensure_connection`](Self::ensure_connection).
    pub fn current(&self) -> Option<&C::Connection> {
        self.current.as_ref()
    }

    /// Number of handles opened so far.
    pub fn opened(&self) -> u64 {
        self.opened
    }

    /// Close the current handle, if any.
    pub async fn release(&mut self) {
        if let Some(conn) = self.current.take() {
            close_quietly(conn).await;
        }
    }
}

async fn close_quietly<T: Connection>(conn: T) {
    if let Err(e) = conn.close().await {
        tracing::warn!(error = %e, "Failed to close connection, continuing");
    }
}
