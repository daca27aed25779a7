//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → overrides.rs (command-line flags win)
//!     → validation.rs (semantic checks)
//!     → ProberConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the loop starts
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Durations use Go-style strings ("100ms", "1m30s")

pub mod duration;
pub mod loader;
pub mod overrides;
pub mod schema;
pub mod validation;

use std::path::Path;

pub use loader::ConfigError;
pub use overrides::ConfigOverrides;
pub use schema::{LogFormat, ObservabilityConfig, ProberConfig};

/// Resolve the effective configuration: file (or defaults), then overrides,
/// then validation.
pub fn resolve(file: Option<&Path>, overrides: ConfigOverrides) -> Result<ProberConfig, ConfigError> {
    let mut config = match file {
        Some(path) => loader::load_config(path)?,
        None => ProberConfig::default(),
    };
    overrides.apply(&mut config);
    validation::validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
