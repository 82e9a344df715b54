//! Client configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::backend::DEFAULT_BACKEND_URL;
use crate::entry::Mode;
use crate::history::MAX_HISTORY_ITEMS;

/// Client configuration, read from `~/.shellpilot/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Backend connection
    #[serde(default)]
    pub backend: BackendConfig,
    /// Navigation history
    #[serde(default)]
    pub history: HistoryConfig,
    /// Health checks
    #[serde(default)]
    pub health: HealthConfig,
    /// Prompt defaults
    #[serde(default)]
    pub ui: UiConfig,
}

/// Backend connection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the execution backend (default: "http://localhost:5000")
    #[serde(default = "default_backend_url")]
    pub url: String,
    /// Per-request timeout in seconds; 0 disables it (default: 60)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl BackendConfig {
    /// The request timeout, or `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

/// Navigation history configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Number of submissions kept for recall (default: 100)
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// Root directory for per-session storage (default: ~/.shellpilot/sessions)
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
}

fn default_max_items() -> usize {
    MAX_HISTORY_ITEMS
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_items: default_max_items(), storage_dir: None }
    }
}

impl HistoryConfig {
    /// Resolved storage root.
    pub fn storage_root(&self) -> Result<PathBuf> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(ShellConfig::home_dir()?.join("sessions")),
        }
    }
}

/// Health check configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Seconds between background health checks; 0 checks only at startup
    #[serde(default)]
    pub interval_secs: u64,
}

impl HealthConfig {
    pub fn interval(&self) -> Option<Duration> {
        (self.interval_secs > 0).then(|| Duration::from_secs(self.interval_secs))
    }
}

/// Prompt configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Mode selected at startup (default: manual)
    #[serde(default)]
    pub default_mode: Mode,
}

impl ShellConfig {
    /// `~/.shellpilot`
    pub fn home_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(home.join(".shellpilot"))
    }

    /// Get the config file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// Load configuration from the default path, writing defaults if missing.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: ShellConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to `path` with explanatory comments.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let mut toml = String::new();
        toml.push_str("# shellpilot configuration\n\n");

        toml.push_str("[backend]\n");
        toml.push_str("# Base URL of the execution backend\n");
        toml.push_str(&format!("url = {}\n", toml_string(&self.backend.url)));
        toml.push_str("# Seconds before a request is abandoned as unreachable (0 = never)\n");
        toml.push_str(&format!("request_timeout_secs = {}\n\n", self.backend.request_timeout_secs));

        toml.push_str("[history]\n");
        toml.push_str("# Number of submitted inputs kept for up/down recall\n");
        toml.push_str(&format!("max_items = {}\n", self.history.max_items));
        toml.push_str("# Root directory for per-session storage\n");
        match &self.history.storage_dir {
            Some(dir) => toml.push_str(&format!(
                "storage_dir = {}\n\n",
                toml_string(&dir.to_string_lossy())
            )),
            None => toml.push_str("# storage_dir = \"/path/to/sessions\"\n\n"),
        }

        toml.push_str("[health]\n");
        toml.push_str("# Seconds between background health checks (0 = startup and Ctrl+R only)\n");
        toml.push_str(&format!("interval_secs = {}\n\n", self.health.interval_secs));

        toml.push_str("[ui]\n");
        toml.push_str("# Mode at startup: \"manual\" or \"natural_language\"\n");
        toml.push_str(&format!("default_mode = {}\n", toml_string(self.ui.default_mode.as_str())));

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

/// Quotes and escapes `value` as a TOML string.
fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}
