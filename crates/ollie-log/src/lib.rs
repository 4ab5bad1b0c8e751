//! Structured logging for the ride layer via the `tracing` ecosystem.
//!
//! Console output with uptime timestamps and module paths, plus an optional
//! JSON file layer in debug builds for post-mortem analysis. The filter
//! respects `RUST_LOG` and falls back to the config's `log_level` setting.

use ollie_config::Config;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes the tracing subscriber.
///
/// * `log_dir`: optional directory for JSON log files (debug builds only).
/// * `debug_build`: enables the file layer.
/// * `config`: optional configuration carrying a log level override.
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = config
        .map(|c| c.debug.log_level.as_str())
        .filter(|level| !level.is_empty())
        .unwrap_or("info")
        .to_string();

    // RUST_LOG wins over the config setting.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join("ollie.log"))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// An `EnvFilter` with the default filter string.
#[must_use]
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new("info")
}
