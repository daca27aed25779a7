//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve the target from validated configuration
//! - Open the output log
//! - Install signal handlers
//! - Assemble the controller and hand it the shutdown listener
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and happens before the first tick
//! - Signal handlers are installed before the loop starts

use crate::config::duration;
use crate::config::ProberConfig;
use crate::error::ProberError;
use crate::health::Prober;
use crate::lifecycle::controller::{Controller, RunSummary};
use crate::lifecycle::{shutdown, signals};
use crate::net::{RedisConnector, TargetUrl};
use crate::recorder::AppendLog;

/// Controller wired to a real Redis target and output log.
pub type RedisController = Controller<RedisConnector, AppendLog>;

/// Build a controller from `config`. Fails if the target URL is invalid or
/// the output log cannot be opened.
pub async fn prepare(config: &ProberConfig) -> Result<RedisController, ProberError> {
    let target = TargetUrl::parse(&config.url)?;
    let address = target.address();

    let log = AppendLog::open(&config.output)
        .await
        .map_err(|source| ProberError::OpenLog {
            path: config.output.clone(),
            source,
        })?;

    tracing::info!(
        target_addr = %address,
        output = %config.output.display(),
        interval = %duration::format(config.interval),
        probe_timeout = %duration::format(config.probe_timeout),
        mode = config.strategy().as_str(),
        "Prober starting"
    );

    Ok(Controller::new(
        RedisConnector::new(target),
        config.strategy(),
        Prober::new(address, config.probe_timeout),
        log,
        config.interval,
    ))
}

/// Full run: prepare, install signal handlers, loop until signalled.
pub async fn run(config: &ProberConfig) -> Result<RunSummary, ProberError> {
    let mut controller = prepare(config).await?;

    let (trigger, listener) = shutdown::channel();
    let signal_task = signals::spawn_listener(trigger).map_err(ProberError::Signals)?;

    let result = controller.run(listener).await;
    signal_task.abort();

    if let Ok(summary) = &result {
        tracing::info!(ticks = summary.ticks, "Shutdown complete");
    }
    result
}
