//! Execution backend boundary.
//!
//! The backend runs commands and translates natural-language requests; this
//! crate only talks to it. [`Backend`] is the seam: [`HttpBackend`] speaks the
//! JSON-over-HTTP protocol, tests substitute scripted fakes.

mod http;

pub use http::{DEFAULT_BACKEND_URL, HttpBackend};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entry::Mode;

/// Failure of a backend round trip.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend answered with a non-2xx status and an error body.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The backend could not be reached or answered with something unreadable.
    #[error("{0}")]
    Transport(String),
}

impl BackendError {
    /// Whether the backend process answered at all.
    pub fn backend_answered(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Body of `POST /execute`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub cmd: String,
}

/// Body of `POST /natural-language`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaturalLanguageRequest {
    pub query: String,
}

/// Success body shared by both execution endpoints.
///
/// Every field except `success` may be omitted; omitted fields fall back to
/// what the client already knows about the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub original_query: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub converted_command: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    /// Kept as a string so an unknown value degrades instead of failing the parse.
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub return_code: Option<i32>,
    /// Diagnostic text reported next to the output (stderr, failure reason).
    #[serde(default)]
    pub error: Option<String>,
}

impl CommandResponse {
    /// The reported mode, when it is one the client understands.
    pub fn parsed_mode(&self) -> Option<Mode> {
        self.mode.as_deref().and_then(Mode::from_wire)
    }
}

/// Error body of a non-2xx answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Body of `GET /health`. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub gemini_configured: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub working_directory: Option<String>,
}

/// Result of one execution round trip.
pub type CommandOutcome = Result<CommandResponse, BackendError>;

/// A command execution backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Queries availability and feature flags.
    async fn health(&self) -> Result<HealthResponse, BackendError>;

    /// Runs a shell command verbatim.
    async fn execute(&self, cmd: &str) -> CommandOutcome;

    /// Translates a plain-language query into a command and runs it.
    async fn natural_language(&self, query: &str) -> CommandOutcome;

    /// Routes `input` to the endpoint for `mode`.
    async fn dispatch(&self, mode: Mode, input: &str) -> CommandOutcome {
        match mode {
            Mode::Manual => self.execute(input).await,
            Mode::NaturalLanguage => self.natural_language(input).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_response_tolerates_missing_fields() {
        let response: CommandResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(response.success);
        assert!(response.output.is_none());
        assert!(response.parsed_mode().is_none());
    }

    #[test]
    fn test_command_response_unknown_mode_degrades() {
        let response: CommandResponse =
            serde_json::from_str(r#"{"success": true, "mode": "quantum"}"#).unwrap();
        assert_eq!(response.mode.as_deref(), Some("quantum"));
        assert_eq!(response.parsed_mode(), None);
    }

    #[test]
    fn test_health_response_ignores_extra_fields() {
        let health: HealthResponse = serde_json::from_str(
            r#"{"status": "healthy", "python_version": "3.12", "services": {"gemini": "configured"}}"#,
        )
        .unwrap();
        assert!(!health.gemini_configured);
        assert_eq!(health.status.as_deref(), Some("healthy"));
    }

    #[test]
    fn test_backend_error_classification() {
        let rejected = BackendError::Rejected { status: 400, message: "Empty command".to_string() };
        assert!(rejected.backend_answered());
        assert_eq!(rejected.to_string(), "Empty command");
        assert!(!BackendError::Transport("connection refused".to_string()).backend_answered());
    }
}
