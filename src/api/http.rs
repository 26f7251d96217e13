//! HTTP backend using reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{ApiError, Backend, EchoRequest, EchoResponse, HealthResponse, ECHO_PATH, HEALTH_PATH};

/// Backend origin used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8094";
/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(7000);

/// Backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    description: String,
}

impl HttpBackend {
    /// Create a new builder for configuring the backend.
    pub fn builder() -> HttpBackendBuilder {
        HttpBackendBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn health(&self) -> Result<HealthResponse, ApiError> {
        let url = self.url(HEALTH_PATH);
        debug!(%url, "GET health");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn echo(&self, message: &str) -> Result<EchoResponse, ApiError> {
        let url = self.url(ECHO_PATH);
        debug!(%url, len = message.len(), "POST echo");

        let response = self
            .client
            .post(&url)
            .json(&EchoRequest { message })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for [`HttpBackend`].
#[derive(Debug, Default)]
pub struct HttpBackendBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl HttpBackendBuilder {
    /// Set the backend origin (e.g., "http://localhost:8094").
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout (default: 7 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the backend.
    pub fn build(self) -> Result<HttpBackend, ApiError> {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let base_url = normalize_base_url(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(HttpBackend {
            client,
            description: format!("backend: {}", base_url),
            base_url,
        })
    }
}

// Trim trailing slashes so paths can be appended directly
fn normalize_base_url(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ApiError::Config(format!(
            "base URL must start with http:// or https://, got '{}'",
            raw
        )));
    }
    Ok(trimmed.to_string())
}
