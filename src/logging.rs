use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::APP_NAME;

pub const LOG_ENV: &str = "CALENDAR_SCHEDULER_LOG";

/// Log to a daily rolling file under `dir`; the terminal belongs to the UI.
///
/// The returned guard flushes pending lines when dropped and must be held
/// until the program exits.
pub fn init(dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .wrap_err_with(|| format!("Failed to create log directory {}", dir.display()))?;

    let file_appender = RollingFileAppender::new(
        Rotation::DAILY,
        dir,
        format!("{}-{}.log", APP_NAME, env!("CARGO_PKG_VERSION")),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .with(env_filter)
        .try_init()
        .wrap_err("Failed to install tracing subscriber")?;

    Ok(guard)
}
