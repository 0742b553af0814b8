//! Logging setup using tracing.

use anyhow::Result;
use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_NAME: &str = "app.log";

/// 5 MiB per log file.
pub const MAX_LOG_BYTES: u64 = 5 * 1024 * 1024;

/// Rotated files kept next to the live one (`app.log.1` .. `app.log.3`).
pub const MAX_LOG_BACKUPS: usize = 3;

fn default_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("debug,hyper=info,hyper_util=info,reqwest=info")
        } else {
            EnvFilter::new("info")
        }
    })
}

/// Size-capped appender for `log_dir/app.log`, creating the directory.
pub fn file_appender(
    log_dir: &Path,
    max_bytes: u64,
    max_backups: usize,
) -> std::io::Result<(BasicRollingFileAppender, PathBuf)> {
    std::fs::create_dir_all(log_dir)?;
    let path = log_dir.join(LOG_FILE_NAME);
    let appender = BasicRollingFileAppender::new(
        &path,
        RollingConditionBasic::new().max_size(max_bytes),
        max_backups,
    )?;
    Ok((appender, path))
}

/// Initialize logging with a rotating file and console output.
///
/// The returned guard flushes the file writer when dropped; keep it alive
/// for the lifetime of the process.
pub fn init(log_dir: &Path, debug: bool) -> Result<WorkerGuard> {
    let (appender, log_path) = file_appender(log_dir, MAX_LOG_BYTES, MAX_LOG_BACKUPS)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true);

    tracing_subscriber::registry()
        .with(default_filter(debug))
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!("Logging to {}", log_path.display());
    Ok(guard)
}

/// Console-only logging for one-shot CLI commands.
pub fn init_console(debug: bool) {
    tracing_subscriber::registry()
        .with(default_filter(debug))
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
