//! Outcome of a single health check.

use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One measurement. Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Wall-clock instant the probe started.
    pub timestamp: DateTime<Local>,
    /// `host:port` of the probed endpoint.
    pub target: String,
    /// Elapsed time from probe start to completion or timeout.
    pub duration_micro: u64,
    /// `true` iff the probe did not succeed within its bound.
    pub error: bool,
    /// Failure detail, empty on success.
    pub message: String,
}

impl Outcome {
    pub fn success(timestamp: DateTime<Local>, target: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            timestamp,
            target: target.into(),
            duration_micro: micros(elapsed),
            error: false,
            message: String::new(),
        }
    }

    pub fn failure(
        timestamp: DateTime<Local>,
        target: impl Into<String>,
        elapsed: Duration,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            target: target.into(),
            duration_micro: micros(elapsed),
            error: true,
            message: message.into(),
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_micros(self.duration_micro)
    }
}

fn micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}
