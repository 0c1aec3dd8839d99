//! Tracing subscriber setup for the command line tool

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{
    InitError,
    RollingFileAppender,
    Rotation,
};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Default log file name when `--log-file` names a directory.
const DEFAULT_LOG_FILE: &str = "i18n-sync.log";

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `verbose`. Logs go to stderr and, with `log_file`,
/// to that file as well. Keep the returned guard alive until exit so buffered
/// file output is flushed.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<Option<WorkerGuard>, InitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let Some(path) = log_file else {
        tracing_subscriber::registry().with(filter).with(stderr_layer).init();
        return Ok(None);
    };

    let (dir, file_name) = if path.is_dir() {
        (path, Path::new(DEFAULT_LOG_FILE))
    } else {
        (
            path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new(".")),
            path.file_name().map_or_else(|| Path::new(DEFAULT_LOG_FILE), Path::new),
        )
    };

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer))
        .init();

    Ok(Some(guard))
}
