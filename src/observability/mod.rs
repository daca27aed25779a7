//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events on stderr)
//!
//! Measurements themselves go to the output log (recorder), not here.
//! ```

pub mod logging;
