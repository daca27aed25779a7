//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files and
//! carry defaults so an empty file is a valid configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::duration::serde_go;
use crate::net::ConnectStrategy;

/// Root configuration for the prober.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProberConfig {
    /// Redis URL of the probed endpoint (e.g., "redis://localhost:6379/0").
    pub url: String,

    /// Path of the newline-delimited JSON output log.
    pub output: PathBuf,

    /// Wait between the end of one tick and the start of the next.
    #[serde(with = "serde_go")]
    pub interval: Duration,

    /// Tear down and recreate the connection before every probe.
    pub reconnect: bool,

    /// Upper bound for a single probe, connection setup included.
    #[serde(with = "serde_go")]
    pub probe_timeout: Duration,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ProberConfig {
    /// Connection strategy selected by the `reconnect` flag.
    pub fn strategy(&self) -> ConnectStrategy {
        if self.reconnect {
            ConnectStrategy::Reconnect
        } else {
            ConnectStrategy::Persistent
        }
    }
}

impl Default for ProberConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            output: PathBuf::from("output.ndjson"),
            interval: Duration::from_secs(1),
            reconnect: false,
            probe_timeout: Duration::from_secs(3),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Diagnostic log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Format of diagnostic log lines written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line events.
    Pretty,
    /// One JSON object per event.
    Json,
}
