//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! probe.rs:
//!     Borrowed connection handle
//!     → PING bounded by the probe timeout
//!     → outcome.rs (immutable Outcome record)
//! ```
//!
//! # Design Decisions
//! - Probe failures are data, never errors: every probe yields an Outcome
//! - Elapsed time is measured on the monotonic clock, the timestamp on the wall clock
//! - The prober never closes or replaces the handle it is given

pub mod outcome;
pub mod probe;

pub use outcome::Outcome;
pub use probe::Prober;
