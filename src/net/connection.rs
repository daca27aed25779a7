//! Redis connection handle.
//!
//! # Responsibilities
//! - Hold the dial parameters for one logical connection
//! - Dial lazily inside the first PING (opening performs no I/O)
//! - Run the AUTH / SELECT handshake on each fresh socket
//! - Discard the socket after any error so replies never desync
//!
//! A handle owns at most one socket at a time. After a failure the next
//! PING dials exactly once; there is no retry within a single PING.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::io::{AsyncWriteExt, BufStream};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time;

use super::resp::{self, Reply};
use super::url::TargetUrl;
use super::{Connection, Connector, ProbeError};

/// Global atomic counter for connection IDs.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Upper bound for the QUIT exchange when a handle is closed.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Unique identifier for a connection handle, used in log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Opens [`RedisConnection`] handles for a fixed target.
#[derive(Debug, Clone)]
pub struct RedisConnector {
    target: TargetUrl,
}

impl RedisConnector {
    pub fn new(target: TargetUrl) -> Self {
        Self { target }
    }
}

impl Connector for RedisConnector {
    type Connection = RedisConnection;

    fn open(&self) -> RedisConnection {
        RedisConnection::new(self.target.clone())
    }
}

/// A single logical connection to a Redis server.
pub struct RedisConnection {
    id: ConnectionId,
    target: TargetUrl,
    socket: Mutex<Option<BufStream<TcpStream>>>,
}

impl RedisConnection {
    fn new(target: TargetUrl) -> Self {
        Self {
            id: ConnectionId::new(),
            target,
            socket: Mutex::new(None),
        }
    }

    #[cfg(test)]
    async fn is_connected(&self) -> bool {
        self.socket.lock().await.is_some()
    }

    async fn dial(&self) -> Result<BufStream<TcpStream>, ProbeError> {
        let addr = self.target.address();
        tracing::debug!(conn = %self.id, addr = %addr, "Dialing target");

        let tcp = TcpStream::connect(&addr).await?;
        tcp.set_nodelay(true)?;
        let mut stream = BufStream::new(tcp);

        if let Some(password) = &self.target.password {
            let mut args: Vec<&[u8]> = vec![b"AUTH".as_slice()];
            if let Some(username) = &self.target.username {
                args.push(username.as_bytes());
            }
            args.push(password.as_bytes());
            expect_ok(&mut stream, &args).await?;
        }

        if self.target.db != 0 {
            let db = self.target.db.to_string();
            expect_ok(&mut stream, &[b"SELECT".as_slice(), db.as_bytes()]).await?;
        }

        Ok(stream)
    }
}

impl fmt::Debug for RedisConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisConnection")
            .field("id", &self.id)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl Connection for RedisConnection {
    async fn ping(&self) -> Result<(), ProbeError> {
        let mut slot = self.socket.lock().await;

        // Taken out of the slot so a timed-out PING drops the socket.
        let mut stream = match slot.take() {
            Some(stream) => stream,
            None => self.dial().await?,
        };

        match command(&mut stream, &[b"PING".as_slice()]).await? {
            Reply::Simple(status) if status == "PONG" => {
                *slot = Some(stream);
                Ok(())
            }
            Reply::Error(message) => {
                *slot = Some(stream);
                Err(ProbeError::Server(message))
            }
            other => Err(ProbeError::Protocol(format!("unexpected reply to PING: {other:?}"))),
        }
    }

    async fn close(self) -> Result<(), ProbeError> {
        tracing::debug!(conn = %self.id, "Closing connection");
        let Some(mut stream) = self.socket.into_inner() else {
            return Ok(());
        };

        let quit = async {
            stream.write_all(&resp::encode_command(&[b"QUIT".as_slice()])).await?;
            stream.flush().await?;
            stream.shutdown().await
        };
        time::timeout(CLOSE_TIMEOUT, quit)
            .await
            .map_err(|_| ProbeError::Timeout(CLOSE_TIMEOUT))??;
        Ok(())
    }
}

async fn command(stream: &mut BufStream<TcpStream>, args: &[&[u8]]) -> Result<Reply, ProbeError> {
    stream.write_all(&resp::encode_command(args)).await?;
    stream.flush().await?;
    resp::read_reply(stream).await
}

async fn expect_ok(stream: &mut BufStream<TcpStream>, args: &[&[u8]]) -> Result<(), ProbeError> {
    match command(stream, args).await? {
        Reply::Simple(_) => Ok(()),
        Reply::Error(message) => Err(ProbeError::Server(message)),
        other => Err(ProbeError::Protocol(format!("unexpected handshake reply: {other:?}"))),
    }
}
