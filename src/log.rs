use std::path::Path;

use anyhow::{Context, Result};
use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Set up logging to stdout and to a log file. The returned guard must be
/// held until exit or buffered file output is lost.
///
/// `RUST_LOG` overrides `log_level` when set.
pub fn init_logger(log_level: String, log_file: String) -> Result<WorkerGuard> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&log_level)?,
    };

    let timer = LocalTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
    ));

    let path = Path::new(&log_file);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let name = path.file_name().context("log file path has no file name")?;
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_timer(timer.clone()))
        .with(
            fmt::layer()
                .with_timer(timer)
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    Ok(guard)
}
