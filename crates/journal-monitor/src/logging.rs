//! Logging setup.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::NonBlocking;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use tracing_appender::non_blocking::WorkerGuard;

/// Setup logging with the given level.
///
/// Console output goes to stderr so report output on stdout stays clean.
/// When `file` is given, a plain-text copy is written to a daily rolling
/// file next to it; keep the returned guard alive until exit so buffered
/// lines get flushed.
pub fn setup_logging(level: &str, json: bool, file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (writer, guard) = match file.map(split_log_path) {
        Some((dir, prefix)) => {
            let appender = tracing_appender::rolling::daily(dir, prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };
    let file_layer = writer.map(|w: NonBlocking| fmt::layer().with_writer(w).with_ansi(false));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }

    guard
}

/// Directory and file-name prefix for the rolling appender.
fn split_log_path(path: &Path) -> (PathBuf, String) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let prefix = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "trade-journal.log".to_string());
    (dir, prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_log_path() {
        let (dir, prefix) = split_log_path(Path::new("logs/journal.log"));
        assert_eq!(dir, PathBuf::from("logs"));
        assert_eq!(prefix, "journal.log");

        let (dir, prefix) = split_log_path(Path::new("journal.log"));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(prefix, "journal.log");
    }
}
