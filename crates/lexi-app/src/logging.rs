use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Context;
use lexi_config::LogConfig;
use tracing_subscriber::EnvFilter;

/// Sends log events to the configured file, the terminal being taken by the
/// interactive session. `RUST_LOG` takes precedence over the configured level.
pub fn init(config: &LogConfig) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .with_context(|| format!("unable to open log file {}", config.file.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .with_context(|| format!("invalid log level {:?}", config.level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("unable to install logger: {e}"))?;

    Ok(())
}
