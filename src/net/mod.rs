//! Network subsystem: everything that talks to the probed Redis server.
//!
//! # Data Flow
//! ```text
//! url.rs        redis:// URL → TargetUrl (host:port, credentials, db)
//! manager.rs    ConnectStrategy → open / reuse / replace the handle
//! connection.rs lazy dial → AUTH / SELECT → PING
//! resp.rs       RESP2 command encoding and reply decoding
//! ```
//!
//! # Design Decisions
//! - Opening a handle never blocks on network I/O
//! - One dial and one command per probe, no retry layer
//! - Close errors are logged, never fatal

pub mod connection;
pub mod manager;
pub mod resp;
pub mod url;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

pub use connection::{ConnectionId, RedisConnection, RedisConnector};
pub use manager::{ConnectStrategy, ConnectionManager};
pub use url::{TargetUrl, TargetUrlError};

/// Failure of a single probe or close. The `Display` text becomes the
/// record's `message`.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("i/o timeout after {0:?}")]
    Timeout(Duration),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("{0}")]
    Server(String),

    #[error("connection closed by server")]
    Closed,
}

/// A handle able to run one health check at a time.
pub trait Connection: Send + Sync {
    /// Issue a single health check.
    fn ping(&self) -> impl Future<Output = Result<(), ProbeError>> + Send;

    /// Release the handle and whatever socket it holds.
    fn close(self) -> impl Future<Output = Result<(), ProbeError>> + Send
    where
        Self: Sized;
}

/// Creates connection handles. Must not perform I/O.
pub trait Connector: Send {
    type Connection: Connection;

    fn open(&self) -> Self::Connection;
}
