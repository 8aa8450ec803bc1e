//! Configuration handling for the TUI

use crate::logging::LogLevel;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TOAST_DURATION_MS: u64 = 3000;
pub const DEFAULT_NAV_COLLAPSE_WIDTH: u16 = 100;

const ENV_API_URL: &str = "CLIENTDESK_API_URL";
const ENV_CLIENT_ID: &str = "CLIENTDESK_CLIENT_ID";

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TuiConfig {
    /// Backend base URL
    pub api_base_url: Option<String>,
    /// Client whose forms the builder manages
    pub client_id: Option<i64>,
    pub log_level: Option<LogLevel>,
    /// How long a toast stays on screen
    pub toast_duration_ms: Option<u64>,
    /// Terminal width above which the navigation drawer closes itself
    pub nav_collapse_width: Option<u16>,
    /// Problems met while loading, logged once logging is up
    #[serde(skip)]
    warnings: Vec<String>,
}

impl TuiConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "clientdesk", "clientdesk-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Where the log file is written
    pub fn log_path() -> PathBuf {
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join("clientdesk-tui.log"))
            .unwrap_or_else(|| std::env::temp_dir().join("clientdesk-tui.log"))
    }

    /// Load configuration from file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_or_create(Self::config_path())?;
        config.apply_overrides(
            std::env::var(ENV_API_URL).ok(),
            std::env::var(ENV_CLIENT_ID).ok(),
        );
        Ok(config)
    }

    /// Load the file at `path`, writing a default one when it is missing
    fn load_or_create(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => {
                let mut config = Self::default();
                if let Err(err) = config.save_to(&path) {
                    config.warnings.push(format!(
                        "could not write default config {}: {err:#}",
                        path.display()
                    ));
                }
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Drain the warnings collected while loading
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    /// Load configuration from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    fn apply_overrides(&mut self, api_url: Option<String>, client_id: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = Some(url);
        }
        if let Some(raw) = client_id {
            match raw.trim().parse() {
                Ok(id) => self.client_id = Some(id),
                Err(_) => self
                    .warnings
                    .push(format!("ignoring non-numeric {ENV_CLIENT_ID} {raw:?}")),
            }
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level.unwrap_or_default()
    }

    pub fn toast_duration_ms(&self) -> u64 {
        self.toast_duration_ms.unwrap_or(DEFAULT_TOAST_DURATION_MS)
    }

    pub fn nav_collapse_width(&self) -> u16 {
        self.nav_collapse_width.unwrap_or(DEFAULT_NAV_COLLAPSE_WIDTH)
    }
}
