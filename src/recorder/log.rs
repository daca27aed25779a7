//! Append-only newline-delimited JSON log file.

use std::path::Path;

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

use super::{encode, RecordError, RecordSink};
use crate::health::Outcome;

/// Permissions for a newly created log file.
#[cfg(unix)]
const LOG_MODE: u32 = 0o640;

/// Output log opened for append + create + write.
#[derive(Debug)]
pub struct AppendLog {
    file: File,
}

impl AppendLog {
    /// Open (creating if absent) the log at `path`. Existing lines are never
    /// touched.
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let mut options = OpenOptions::new();
        options.append(true).create(true);
        #[cfg(unix)]
        options.mode(LOG_MODE);

        let file = options.open(path).await?;
        Ok(Self { file })
    }
}

impl RecordSink for AppendLog {
    async fn append(&mut self, outcome: &Outcome) -> Result<(), RecordError> {
        let line = encode(outcome)?;
        self.file.write_all(&line).await?;
        self.file.flush().await?;
        self.file.sync_data().await?;
        Ok(())
    }
}
