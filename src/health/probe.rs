//! Timeout-bounded health probing.
//!
//! # Responsibilities
//! - Time a single PING against a borrowed connection handle
//! - Bound it by the probe timeout
//! - Turn success, error or timeout into an [`Outcome`]

use std::time::Duration;

use chrono::Local;
use tokio::time::{self, Instant};

use crate::health::outcome::Outcome;
use crate::net::{Connection, ProbeError};

/// Executes health checks for one target.
#[derive(Debug, Clone)]
pub struct Prober {
    target: String,
    timeout: Duration,
}

impl Prober {
    pub fn new(target: impl Into<String>, timeout: Duration) -> Self {
        Self {
            target: target.into(),
            timeout,
        }
    }

    /// Run one health check. Always returns within the timeout (plus
    /// scheduling slack); failures are captured in the outcome.
    pub async fn probe<C: Connection>(&self, conn: &C) -> Outcome {
        let timestamp = Local::now();
        let start = Instant::now();

        let result = match time::timeout(self.timeout, conn.ping()).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(self.timeout)),
        };
        let elapsed = start.elapsed();

        match result {
            Ok(()) => Outcome::success(timestamp, self.target.as_str(), elapsed),
            Err(e) => {
                tracing::warn!(addr = %self.target, error = %e, elapsed = ?elapsed, "Probe failed");
                Outcome::failure(timestamp, self.target.as_str(), elapsed, e.to_string())
            }
        }
    }
}
