//! Backend reachability and feature flags.

use std::fmt;

use tracing::{info, warn};

use crate::backend::{Backend, BackendError, HealthResponse};

/// Whether the backend process answered the last request or health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// Nothing has been heard yet.
    #[default]
    Unknown,
    Online,
    Offline,
}

impl Connectivity {
    pub fn is_online(self) -> bool {
        self == Self::Online
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "connecting",
            Self::Online => "online",
            Self::Offline => "offline",
        })
    }
}

/// Informational fields from the last successful health check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendInfo {
    pub status: Option<String>,
    pub working_directory: Option<String>,
}

/// Tracks connectivity and whether natural-language mode is available.
#[derive(Debug, Default)]
pub struct CapabilityMonitor {
    connectivity: Connectivity,
    natural_language_enabled: bool,
    info: Option<BackendInfo>,
}

impl CapabilityMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queries the backend's health endpoint once and applies the result.
    pub async fn check_health(&mut self, backend: &dyn Backend) -> Connectivity {
        let result = backend.health().await;
        self.apply_health(result)
    }

    /// Applies a health check result obtained elsewhere.
    ///
    /// A failed check only affects connectivity; the capability flag keeps
    /// its last known value.
    pub fn apply_health(&mut self, result: Result<HealthResponse, BackendError>) -> Connectivity {
        match result {
            Ok(health) => {
                if health.gemini_configured != self.natural_language_enabled {
                    info!(enabled = health.gemini_configured, "Natural-language mode availability changed");
                }
                self.natural_language_enabled = health.gemini_configured;
                self.info = Some(BackendInfo {
                    status: health.status,
                    working_directory: health.working_directory,
                });
                self.connectivity = Connectivity::Online;
            }
            Err(e) => {
                warn!(error = %e, "Health check failed");
                self.connectivity = Connectivity::Offline;
            }
        }
        self.connectivity
    }

    /// Records reachability learned from an execution round trip.
    pub fn record(&mut self, connectivity: Connectivity) {
        self.connectivity = connectivity;
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    pub fn natural_language_enabled(&self) -> bool {
        self.natural_language_enabled
    }

    pub fn info(&self) -> Option<&BackendInfo> {
        self.info.as_ref()
    }
}
