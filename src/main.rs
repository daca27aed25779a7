use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, Parser};

use redis_prober::config::{self, duration, ConfigOverrides, LogFormat};
use redis_prober::lifecycle::startup;
use redis_prober::observability::logging;

#[derive(Parser)]
#[command(name = "redis-prober", version)]
#[command(about = "Measure Redis PING latency and append every result to an NDJSON log", long_about = None)]
struct Cli {
    /// Redis URL to probe [default: redis://localhost:6379]
    #[arg(long)]
    url: Option<String>,

    /// Output file [default: output.ndjson]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Wait between probes, e.g. 100ms, 1s, 1m [default: 1s]
    #[arg(long, value_parser = duration::parse)]
    interval: Option<Duration>,

    /// Reconnect before every probe; `--reconnect=false` keeps one connection
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", action = ArgAction::Set)]
    reconnect: Option<bool>,

    /// Bound for a single probe [default: 3s]
    #[arg(long, value_parser = duration::parse)]
    probe_timeout: Option<Duration>,

    /// TOML configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error) [default: info]
    #[arg(long)]
    log_level: Option<String>,

    /// Diagnostic log format [default: pretty]
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            url: self.url.clone(),
            output: self.output.clone(),
            interval: self.interval,
            reconnect: self.reconnect,
            probe_timeout: self.probe_timeout,
            log_level: self.log_level.clone(),
            log_format: self.log_format,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config::resolve(cli.config.as_deref(), cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("exited with error: configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.observability.log_level, config.observability.log_format) {
        eprintln!("exited with error: cannot initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match startup::run(&config).await {
        Ok(summary) => {
            eprintln!("received signal: {}", summary.signal);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("exited with error: {e}");
            ExitCode::FAILURE
        }
    }
}
