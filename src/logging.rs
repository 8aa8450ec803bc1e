//! Logging setup and structured event helpers
//!
//! The terminal belongs to the UI, so events go to a log file. The level is
//! taken from configuration only.

use crate::api::ApiError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Minimum severity that gets written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Off => "off",
        }
    }

    /// Filter directive scoping the level to this crate
    pub fn directive(&self) -> String {
        format!("{}={}", env!("CARGO_CRATE_NAME"), self.as_str())
    }
}

/// Background writer appending to the file at `path`
fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Log path {} has no file name", path.display()))?;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    // Same as `rolling::never`, but reports an unopenable file instead of panicking
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Install the global subscriber writing to the file at `path`.
/// Buffered events are flushed when the returned guard is dropped.
pub fn init(level: LogLevel, path: &Path) -> Result<WorkerGuard> {
    let (writer, guard) = file_writer(path)?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(level.directive())?)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .try_init()?;

    tracing::info!(level = level.as_str(), "logging initialised");
    Ok(guard)
}

pub fn api_call(method: &str, url: &str) {
    tracing::debug!(method, url, "api call");
}

pub fn api_response(method: &str, url: &str, status: u16) {
    tracing::debug!(method, url, status, "api response");
}

pub fn api_error(method: &str, url: &str, error: &ApiError) {
    tracing::warn!(method, url, error = %error, "api request failed");
}

pub fn user_action(action: &str, detail: &str) {
    tracing::info!(action, detail, "user action");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_directive_is_scoped_to_crate() {
        assert_eq!(LogLevel::Warn.directive(), "clientdesk_tui=warn");
        assert_eq!(LogLevel::Off.directive(), "clientdesk_tui=off");
    }

    #[test]
    fn test_default_level_is_info() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }

    #[test]
    fn test_level_serialization() {
        assert_eq!(serde_json::to_string(&LogLevel::Debug).unwrap(), "\"debug\"");
        let parsed: LogLevel = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(parsed, LogLevel::Error);
    }

    #[test]
    fn test_file_writer_creates_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("clientdesk-tui.log");
        fs::create_dir_all(dir.path().join("logs")).unwrap();
        fs::write(&path, "earlier run\n").unwrap();

        let (mut writer, guard) = file_writer(&path).unwrap();
        writer.write_all(b"api call\n").unwrap();
        drop(guard);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "earlier run\napi call\n");
    }

    #[test]
    fn test_file_writer_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("app.log");

        let (mut writer, guard) = file_writer(&path).unwrap();
        writer.write_all(b"started\n").unwrap();
        drop(guard);

        assert_eq!(fs::read_to_string(&path).unwrap(), "started\n");
    }

    #[test]
    fn test_every_directive_parses() {
        for level in [
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
            LogLevel::Off,
        ] {
            assert!(EnvFilter::try_new(level.directive()).is_ok());
        }
    }
}
