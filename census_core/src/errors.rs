//! Core error types for the Census client.
//!
//! Every failure surfaces as a [`CensusError`]. The variant records the cause
//! (transport, envelope, sync run, network, configuration) so callers can
//! branch on it, while the display text stays the same as the messages the
//! Census integration has always raised.

use crate::http::HttpError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP error details for a non-200 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpErrorInfo {
    /// HTTP status code (e.g., 401, 500)
    pub status: u16,
    /// Request URL
    pub url: String,
    /// Reason phrase for the status
    pub reason: String,
    /// First 200 chars of response body (for debugging)
    pub body_snippet: Option<String>,
}

impl std::fmt::Display for HttpErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "There was an error while calling Census API: {} (HTTP {} for {})",
            self.reason, self.status, self.url
        )?;
        if let Some(ref snippet) = self.body_snippet {
            let truncated: String = snippet.chars().take(200).collect();
            write!(f, " | body[0:200]={}", truncated)?;
        }
        Ok(())
    }
}

/// Sync run failure details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRunFailure {
    /// Sync run that reported `failed`
    pub sync_run_id: i64,
    /// `error_message` reported by Census
    pub message: String,
}

impl std::fmt::Display for SyncRunFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Census API failure: {}", self.message)
    }
}

/// Unified error enum for all Census client errors.
#[derive(Debug, Error)]
pub enum CensusError {
    /// Invalid input provided
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// URL parsing failed
    #[error("url parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// HTTP request failed (network layer)
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Census answered with a status other than 200
    #[error("{0}")]
    HttpResponse(HttpErrorInfo),

    /// Census answered 200 with an `error` envelope
    #[error("Census API responded with error: {0}")]
    Api(String),

    /// The sync run reported `failed`
    #[error("{0}")]
    SyncRunFailed(SyncRunFailure),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Poll deadline or attempt cap exhausted
    #[error("timeout: {0}")]
    Timeout(String),

    /// Response body was not a valid envelope
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl CensusError {
    /// Create an HTTP response error.
    pub fn http_response(status: u16, url: &str, reason: &str, body: Option<&str>) -> Self {
        CensusError::HttpResponse(HttpErrorInfo {
            status,
            url: url.to_string(),
            reason: reason.to_string(),
            body_snippet: body.map(|s| s.chars().take(200).collect()),
        })
    }

    /// Create an error for an `error` envelope.
    pub fn api(message: impl Into<String>) -> Self {
        CensusError::Api(message.into())
    }

    /// Create a sync run failure.
    pub fn sync_run_failed(sync_run_id: i64, message: impl Into<String>) -> Self {
        CensusError::SyncRunFailed(SyncRunFailure {
            sync_run_id,
            message: message.into(),
        })
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        CensusError::Timeout(message.into())
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        CensusError::Config(message.into())
    }

    /// Create a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        CensusError::Protocol(message.into())
    }

    /// Check if the sync run itself failed.
    pub fn is_sync_run_failure(&self) -> bool {
        matches!(self, CensusError::SyncRunFailed(_))
    }

    /// Check if Census rejected the call through the envelope.
    pub fn is_api_error(&self) -> bool {
        matches!(self, CensusError::Api(_))
    }

    /// Get HTTP status code if this is an HTTP error.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            CensusError::HttpResponse(info) => Some(info.status),
            CensusError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<HttpError> for CensusError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Request(e) => CensusError::Http(e),
            HttpError::Response(detail) => CensusError::HttpResponse(HttpErrorInfo {
                status: detail.status,
                url: detail.url,
                reason: detail.reason,
                body_snippet: detail.body_snippet,
            }),
            HttpError::InvalidHeader(msg) => CensusError::InvalidInput(msg),
            HttpError::JsonParse(msg) => CensusError::Protocol(msg),
        }
    }
}

/// Result type alias using CensusError.
pub type CensusResult<T> = Result<T, CensusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = CensusError::http_response(
            401,
            "https://app.getcensus.com/api/v1/sync_runs/1",
            "Unauthorized",
            None,
        );
        let msg = err.to_string();
        assert!(msg.starts_with("There was an error while calling Census API: Unauthorized"));
        assert!(msg.contains("401"));
    }

    #[test]
    fn test_api_error_display() {
        let err = CensusError::api("panic!");
        assert_eq!(err.to_string(), "Census API responded with error: panic!");
        assert!(err.is_api_error());
    }

    #[test]
    fn test_sync_run_failed_display() {
        let err = CensusError::sync_run_failed(1234567890, "failed!");
        assert_eq!(err.to_string(), "Census API failure: failed!");
        assert!(err.is_sync_run_failure());
    }

    #[test]
    fn test_http_status() {
        let err = CensusError::http_response(503, "https://app.getcensus.com", "Service Unavailable", None);
        assert_eq!(err.http_status(), Some(503));

        let err_api = CensusError::api("nope");
        assert_eq!(err_api.http_status(), None);
    }

    #[test]
    fn test_body_snippet_truncated() {
        let body = "x".repeat(500);
        let err = CensusError::http_response(500, "https://app.getcensus.com", "Internal Server Error", Some(&body));
        match err {
            CensusError::HttpResponse(info) => {
                assert_eq!(info.body_snippet.map(|s| s.len()), Some(200));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
