use std::io;
use std::path::PathBuf;

use tracing::warn;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Used when RUST_LOG is unset. Keeps stderr quiet apart from problems.
pub const DEFAULT_LOG_FILTER: &str = "warn";
const LOG_FILE_PREFIX: &str = "slack_notify";

pub struct FileLogger {
    log_directory: PathBuf,
    rotation: Rotation,
}

impl FileLogger {
    pub fn new(log_directory: PathBuf) -> Self {
        Self {
            log_directory,
            rotation: Rotation::DAILY,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn setup_file_logging(&self) -> io::Result<(NonBlocking, WorkerGuard)> {
        // Ensure log directory exists
        std::fs::create_dir_all(&self.log_directory)?;

        let file_appender = RollingFileAppender::new(
            self.rotation.clone(),
            &self.log_directory,
            LOG_FILE_PREFIX,
        );

        Ok(tracing_appender::non_blocking(file_appender))
    }
}

/// Install the global subscriber. Console output goes to stderr since stdout carries
/// the webhook response. With `log_dir`, events are also written to a daily rolling file;
/// the returned guard must live until exit so buffered lines get flushed.
pub fn setup_logging(log_dir: Option<PathBuf>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let mut setup_error = None;
    let (file_writer, guard) = match log_dir.map(FileLogger::new) {
        Some(logger) => match logger.setup_file_logging() {
            Ok((writer, guard)) => (Some(writer), Some(guard)),
            Err(e) => {
                setup_error = Some(e);
                (None, None)
            }
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_writer.map(|writer| fmt::layer().with_writer(writer).with_ansi(false)))
        .init();

    if let Some(e) = setup_error {
        warn!("File logging disabled: {}", e);
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_logging_creates_directory() {
        let dir = std::env::temp_dir().join(format!("slack_notify_logs_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let logger = FileLogger::new(dir.clone()).with_rotation(Rotation::NEVER);
        let (_writer, _guard) = logger.setup_file_logging().unwrap();
        assert!(dir.is_dir());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
