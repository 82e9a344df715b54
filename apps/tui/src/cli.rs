//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use shellpilot_core::{HistoryScope, Mode, ShellConfig};

/// shellpilot - a terminal front end for a remote command runner
///
/// Type shell commands, or plain-language requests when the backend has
/// natural-language translation configured.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "shellpilot", author, version, about = "shellpilot - remote shell with natural-language mode")]
pub struct Args {
    /// Backend base URL (overrides [backend] url)
    #[arg(short = 'b', long)]
    pub backend_url: Option<String>,

    /// Session identifier; each session keeps its own history
    #[arg(short, long, env = "SHELLPILOT_SESSION", default_value = "default")]
    pub session: String,

    /// Config file (default: ~/.shellpilot/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Preferred mode at startup: manual or natural_language
    #[arg(short, long, value_parser = parse_mode)]
    pub mode: Option<Mode>,

    /// Keep history in memory only
    #[arg(long)]
    pub ephemeral: bool,
}

fn parse_mode(value: &str) -> Result<Mode, String> {
    match value {
        "ai" | "nl" => Ok(Mode::NaturalLanguage),
        other => Mode::from_wire(other)
            .ok_or_else(|| format!("unknown mode '{}' (expected manual or natural_language)", other)),
    }
}

impl Args {
    /// Loads the config file and applies command-line overrides.
    pub fn resolve_config(&self) -> anyhow::Result<ShellConfig> {
        let mut config = match &self.config {
            Some(path) => ShellConfig::load_from(path)?,
            None => ShellConfig::load()?,
        };
        if let Some(url) = &self.backend_url {
            config.backend.url = url.clone();
        }
        if let Some(mode) = self.mode {
            config.ui.default_mode = mode;
        }
        Ok(config)
    }

    pub fn history_scope(&self) -> HistoryScope {
        if self.ephemeral {
            HistoryScope::Ephemeral
        } else {
            HistoryScope::Persistent(self.session.clone())
        }
    }
}
