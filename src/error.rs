//! Fatal errors: the only failures that end a run with a non-zero status.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::net::TargetUrlError;
use crate::recorder::RecordError;

#[derive(Debug, Error)]
pub enum ProberError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid target: {0}")]
    Target(#[from] TargetUrlError),

    #[error("cannot open output log {}: {source}", path.display())]
    OpenLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot record outcome: {0}")]
    Record(#[from] RecordError),

    #[error("cannot install signal handlers: {0}")]
    Signals(#[source] std::io::Error),
}
