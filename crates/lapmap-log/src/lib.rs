//! Structured logging for lapmap.
//!
//! Library crates log through the `log` facade; this crate installs a
//! `tracing-subscriber` registry that picks those records up, prints them to the
//! console with uptime and module path, and optionally mirrors them as JSON to a
//! log file. The filter comes from `RUST_LOG`, then the config's `log.level`.

use lapmap_config::Config;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config set one.
pub const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// Name of the JSON log file written inside the log directory.
pub const LOG_FILE_NAME: &str = "lapmap.log";

/// Initialize the global tracing subscriber.
///
/// Later calls in the same process keep the first subscriber.
///
/// # Arguments
///
/// * `log_dir` - Directory for the JSON log file, used when `config.log.file_logging` is set
/// * `config` - Optional configuration supplying the log level
///
/// # Examples
///
/// ```no_run
/// use lapmap_log::init_logging;
/// use lapmap_config::Config;
///
/// init_logging(None, None);
///
/// let mut config = Config::default();
/// config.log.file_logging = true;
/// init_logging(Some(std::path::Path::new("./logs")), Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, config: Option<&Config>) {
    let filter_str = filter_string(config);

    // RUST_LOG wins over the config file
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let file_logging = config.is_some_and(|c| c.log.file_logging);
    if file_logging
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        if subscriber.with(file_layer).try_init().is_err() {
            tracing::debug!("Logging already initialized");
        }
        return;
    }

    if subscriber.try_init().is_err() {
        tracing::debug!("Logging already initialized");
    }
}

/// The filter string selected for `config`, before `RUST_LOG` is consulted.
pub fn filter_string(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.log.level.is_empty() => {
            format!("{},wgpu=warn,naga=warn", config.log.level)
        }
        _ => DEFAULT_FILTER.to_string(),
    }
}
