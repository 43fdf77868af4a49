use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::ServiceConfig;
use crate::error::{CoreError, Result};

/// Initializes console logging plus a daily-rotated log file under `log_dir`.
///
/// `RUST_LOG` overrides the default filter. Keep the returned guard alive
/// for the life of the process or buffered file output is lost.
pub fn init_logging(service: &str, config: &ServiceConfig) -> Result<WorkerGuard> {
    fs::create_dir_all(&config.log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, format!("{service}.log"));
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let (json_layer, text_layer) = if config.log_json {
        (Some(fmt::layer().json().with_writer(non_blocking_writer)), None)
    } else {
        (
            None,
            Some(fmt::layer().with_ansi(false).with_writer(non_blocking_writer)),
        )
    };

    let console_layer = fmt::layer().with_writer(std::io::stdout);

    let default_directives = format!("info,{}=debug", service.replace('-', "_"));
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| CoreError::Config(format!("Failed to install tracing subscriber: {e}")))?;

    Ok(guard)
}
