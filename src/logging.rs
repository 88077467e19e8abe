//! Log setup.
//!
//! The TUI owns stdout, so logs only go to a file when one is configured.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

/// Install the global subscriber if a log file is configured.
///
/// Returns `true` when logging was enabled.
pub fn init(settings: &Settings) -> Result<bool> {
    let Some(ref path) = settings.log_file else {
        return Ok(false);
    };

    let subscriber = file_subscriber(path, &settings.log_level)?;
    tracing::subscriber::set_global_default(subscriber)
        .context("a global log subscriber is already installed")?;
    Ok(true)
}

/// Build a plain-text subscriber appending to `path`, filtered by `level`.
pub fn file_subscriber(path: &Path, level: &str) -> Result<impl Subscriber + Send + Sync> {
    let filter = EnvFilter::try_new(level)
        .with_context(|| format!("invalid log level: {}", level))?;
    let file = open_log_file(path)?;

    Ok(tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish())
}

fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_no_log_file_disables_logging() {
        assert!(!init(&Settings::default()).unwrap());
    }

    #[test]
    fn test_file_subscriber_writes_filtered_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("poolwatch.log");

        let subscriber = file_subscriber(&path, "info").unwrap();
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("hidden detail");
            tracing::info!("tick skipped");
        });

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("tick skipped"));
        assert!(!content.contains("hidden detail"));
    }

    #[test]
    fn test_invalid_level_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("poolwatch.log");
        assert!(file_subscriber(&path, "poolwatch=notalevel").is_err());
    }
}
