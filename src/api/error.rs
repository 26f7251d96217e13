//! Error types for backend calls.

use thiserror::Error;

/// Errors that can occur when talking to the NEXUS backend.
///
/// None of these reach the views: the status poller and the prompt console
/// turn every variant into a fallback value.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Backend answered with a non-success status code.
    #[error("Backend returned status {0}")]
    Status(u16),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// Client could not be configured.
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Connection(err.to_string())
        } else if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status(status.as_u16())
        } else {
            ApiError::Http(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        assert_eq!(ApiError::Status(503).to_string(), "Backend returned status 503");
        assert_eq!(ApiError::Timeout.to_string(), "Request timed out");
        assert_eq!(
            ApiError::Parse("expected value".into()).to_string(),
            "Failed to parse response: expected value"
        );
    }
}
