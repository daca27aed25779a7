//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → Resolve target → Open log → Install signals → Run
//!
//! Controller (controller.rs):
//!     Connect → Probe → Record → Wait (interval OR signal) → ...
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Finish current tick → Close connection → Exit 0
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then output log, then the loop
//! - Shutdown is cooperative: a tick is never cut short
//! - A failed append stops the loop with an error

pub mod controller;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use controller::{Controller, RunSummary};
pub use shutdown::{ShutdownListener, ShutdownTrigger};
pub use signals::Signal;
