//! Redis liveness and latency prober.
//!
//! Periodically PINGs a Redis endpoint and appends every measurement as a
//! JSON line to an append-only log, until SIGINT or SIGTERM.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────── lifecycle ────────────────────────┐
//!   │  signals ─▶ shutdown ─┐                                   │
//!   │                       ▼                                   │
//!   │  startup ─▶ controller: connect → probe → record → wait   │
//!   └───────────────┬──────────────┬──────────────┬─────────────┘
//!                   ▼              ▼              ▼
//!              net (manager,   health (prober,  recorder
//!              connection,     outcome)         (append log)
//!              resp, url)
//!
//!   cross-cutting: config (schema/loader/validation), observability, error
//! ```

pub mod config;
pub mod error;
pub mod health;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod recorder;

pub use config::ProberConfig;
pub use error::ProberError;
pub use health::{Outcome, Prober};
pub use lifecycle::{Controller, RunSummary, Signal};
