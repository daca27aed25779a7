//! Durable outcome recording.
//!
//! # Responsibilities
//! - Serialize each [`Outcome`] as one JSON line
//! - Append it to the output log and sync it to storage before returning
//!
//! # Design Decisions
//! - No buffering across ticks: a crash loses at most the in-flight record
//! - Append failures are fatal to the run and surfaced to the caller

pub mod log;

use std::future::Future;

use thiserror::Error;

use crate::health::Outcome;

pub use log::AppendLog;

/// Line terminator written after every record.
pub const RECORD_TERMINATOR: &[u8] = b"\r\n";

/// Failure to durably append a record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write record: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination for outcome records.
pub trait RecordSink: Send {
    /// Append one record. Returns only once it is durable.
    fn append(&mut self, outcome: &Outcome) -> impl Future<Output = Result<(), RecordError>> + Send;
}

/// Encode an outcome as a single terminated line.
pub fn encode(outcome: &Outcome) -> Result<Vec<u8>, RecordError> {
    let mut line = serde_json::to_vec(outcome)?;
    line.extend_from_slice(RECORD_TERMINATOR);
    Ok(line)
}
