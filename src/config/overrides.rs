//! Command-line overrides layered on top of file or default configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::schema::{LogFormat, ProberConfig};

/// Values supplied on the command line. `None` keeps the underlying value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub url: Option<String>,
    pub output: Option<PathBuf>,
    pub interval: Option<Duration>,
    pub reconnect: Option<bool>,
    pub probe_timeout: Option<Duration>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

impl ConfigOverrides {
    /// Apply every present override to `config`.
    pub fn apply(self, config: &mut ProberConfig) {
        if let Some(url) = self.url {
            config.url = url;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(interval) = self.interval {
            config.interval = interval;
        }
        if let Some(reconnect) = self.reconnect {
            config.reconnect = reconnect;
        }
        if let Some(timeout) = self.probe_timeout {
            config.probe_timeout = timeout;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
    }
}
