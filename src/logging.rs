//! Console and file logging.
//!
//! The file writer runs on a background thread; the returned [`LoggingContext`]
//! must stay alive for as long as lines should reach the file.

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::{LogRotation, LoggingSettings};

/// Dependencies that are chatty at debug level.
const QUIET_TARGETS: [&str; 4] = ["hyper", "reqwest", "html5ever", "selectors"];

pub struct LoggingContext {
    guard: WorkerGuard,
}

impl LoggingContext {
    /// Flush buffered lines to the log file.
    pub fn shutdown(self) {
        drop(self.guard);
    }
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_directives(level: &str) -> String {
    let mut directives = vec![level.to_string()];
    if !matches!(level, "trace") {
        directives.extend(QUIET_TARGETS.iter().map(|target| format!("{}=warn", target)));
    }
    directives.join(",")
}

pub fn file_appender(settings: &LoggingSettings) -> Result<RollingFileAppender> {
    let directory = settings
        .file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = settings
        .file
        .file_name()
        .ok_or_else(|| anyhow!("Log file path has no file name: {}", settings.file.display()))?;

    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    Ok(match settings.rotation {
        LogRotation::Never => rolling::never(directory, file_name),
        LogRotation::Daily => rolling::daily(directory, file_name),
        LogRotation::Hourly => rolling::hourly(directory, file_name),
    })
}

/// Install the global subscriber: stdout plus the configured log file.
pub fn init_logging(settings: &LoggingSettings) -> Result<LoggingContext> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directives(&settings.level))
            .with_context(|| format!("Invalid log level '{}'", settings.level))?,
    };

    let (file_writer, guard) = tracing_appender::non_blocking(file_appender(settings)?);

    Registry::default()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()
        .map_err(|e| anyhow!("Failed to install logger: {}", e))?;

    tracing::debug!("Logging to {}", settings.file.display());
    Ok(LoggingContext { guard })
}
