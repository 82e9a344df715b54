//! JSON-over-HTTP backend client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::config::BackendConfig;

use super::{
    Backend, BackendError, CommandOutcome, ErrorBody, ExecuteRequest, HealthResponse,
    NaturalLanguageRequest,
};

/// Default backend address.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// HTTP implementation of [`Backend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: Client,
    timeout: Option<Duration>,
}

impl HttpBackend {
    /// Creates a client for the backend at `base_url` with no request timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        Self::with_timeout(base_url, None)
    }

    /// Creates a client whose requests fail as transport errors after `timeout`.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, BackendError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            timeout,
        })
    }

    /// Creates a client from the `[backend]` configuration section.
    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        Self::with_timeout(config.url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn transport_error(&self, e: &reqwest::Error) -> BackendError {
        error!(error = %e, base_url = %self.base_url, "Backend request failed");
        if e.is_timeout() {
            let after = self
                .timeout
                .map(|t| format!(" after {:?}", t))
                .unwrap_or_default();
            BackendError::Transport(format!("request timed out{}: {}", after, error_chain(e)))
        } else if e.is_connect() {
            BackendError::Transport(format!(
                "backend not reachable at {}: {}",
                self.base_url,
                error_chain(e)
            ))
        } else {
            BackendError::Transport(format!("network error: {}", error_chain(e)))
        }
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;
        self.read(path, response).await
    }

    async fn read<T: DeserializeOwned>(
        &self,
        path: &str,
        response: Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(&e))?;

        if !status.is_success() {
            error!(status = %status, path, body = %text, "Backend returned error status");
            return match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => Err(BackendError::Rejected { status: status.as_u16(), message: body.error }),
                Err(_) => Err(BackendError::Transport(format!(
                    "unexpected response ({}): {}",
                    status,
                    text.trim()
                ))),
            };
        }

        serde_json::from_str(&text).map_err(|e| {
            error!(error = %e, path, "Failed to parse backend response");
            BackendError::Transport(format!("malformed response: {}", e))
        })
    }
}

/// The error and its sources, outermost first. reqwest keeps the OS-level
/// cause (connection refused, reset) in the source chain only.
fn error_chain(e: &reqwest::Error) -> String {
    let mut message = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[async_trait]
impl Backend for HttpBackend {
    async fn health(&self) -> Result<HealthResponse, BackendError> {
        debug!(base_url = %self.base_url, "Checking backend health");
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;
        self.read("/health", response).await
    }

    async fn execute(&self, cmd: &str) -> CommandOutcome {
        debug!(cmd_len = cmd.len(), "Posting command");
        self.post("/execute", &ExecuteRequest { cmd: cmd.to_string() }).await
    }

    async fn natural_language(&self, query: &str) -> CommandOutcome {
        debug!(query_len = query.len(), "Posting natural-language query");
        self.post("/natural-language", &NaturalLanguageRequest { query: query.to_string() })
            .await
    }
}
