//! Logging setup shared by the binaries
//!
//! Progress lines go to stdout via `println!`; tracing output goes to stderr
//! and, when a log directory is given, to a plain-text file in it.

use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Error, Result};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "sitemeta=info";

/// Install the global tracing subscriber
///
/// `file_name` is the log file created inside `log_dir`.
pub fn init_tracing(log_dir: Option<&Path>, file_name: &str) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = RollingFileAppender::new(Rotation::NEVER, dir, file_name);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Other(format!("Failed to initialize logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_log_dir() {
        let temp_dir = tempdir().unwrap();
        let log_dir = temp_dir.path().join("logs");

        // Another test may already own the global subscriber; the directory
        // is created before that matters.
        let _ = init_tracing(Some(&log_dir), "test.log");

        assert!(log_dir.is_dir());
    }
}
