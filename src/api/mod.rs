//! Backend API abstraction.
//!
//! The dashboard talks to two endpoints: the Spring actuator health check
//! and the demo echo endpoint. Both go through the [`Backend`] trait so the
//! poller and console can be exercised against a scripted backend.
//!
//! ```rust,no_run
//! use nexus_console::api::{Backend, HttpBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = HttpBackend::builder()
//!         .base_url("http://localhost:8094")
//!         .build()?;
//!
//!     let health = backend.health().await?;
//!     println!("status: {:?}", health.status());
//!     Ok(())
//! }
//! ```

mod error;
mod http;

pub use error::ApiError;
pub use http::{HttpBackend, HttpBackendBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Health check path (Spring Boot actuator).
pub const HEALTH_PATH: &str = "/actuator/health";
/// Demo echo path used by the prompt console.
pub const ECHO_PATH: &str = "/api/v1/demo/echo";

/// Body of `GET /actuator/health`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    status: Option<serde_json::Value>,
}

impl HealthResponse {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: Some(serde_json::Value::String(status.into())),
        }
    }

    /// The reported status, if the backend sent it as a string.
    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().and_then(|v| v.as_str())
    }
}

/// Body of `POST /api/v1/demo/echo`.
#[derive(Debug, Clone, Serialize)]
pub struct EchoRequest<'a> {
    pub message: &'a str,
}

/// Response of the echo endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EchoResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<serde_json::Value>,
}

impl EchoResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            timestamp: None,
        }
    }
}

/// Trait for the remote NEXUS backend.
///
/// Implementations must be cheap to share across tasks; the dashboard holds
/// one behind an `Arc` and calls it from the status poller and from prompt
/// submissions concurrently.
#[async_trait]
pub trait Backend: Send + Sync + Debug {
    /// Fetch the health signal.
    async fn health(&self) -> Result<HealthResponse, ApiError>;

    /// Send a prompt to the echo endpoint.
    async fn echo(&self, message: &str) -> Result<EchoResponse, ApiError>;

    /// Returns a human-readable description of the backend.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_status_must_be_a_string() {
        let r: HealthResponse = serde_json::from_str(r#"{"status":"UP"}"#).unwrap();
        assert_eq!(r.status(), Some("UP"));

        let r: HealthResponse = serde_json::from_str(r#"{"status":1}"#).unwrap();
        assert_eq!(r.status(), None);

        let r: HealthResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(r.status(), None);
    }

    #[test]
    fn echo_response_tolerates_missing_fields() {
        let r: EchoResponse =
            serde_json::from_str(r#"{"message":"hi","timestamp":"2024-01-01T00:00:00Z"}"#)
                .unwrap();
        assert_eq!(r.message.as_deref(), Some("hi"));

        let r: EchoResponse = serde_json::from_str("{}").unwrap();
        assert!(r.message.is_none());
    }

    #[test]
    fn echo_request_serializes_message_field() {
        let body = serde_json::to_value(EchoRequest { message: "hello" }).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "hello" }));
    }
}
