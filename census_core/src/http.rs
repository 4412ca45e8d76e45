//! HTTP transport for Census API calls.
//!
//! This module provides an async HTTP client that carries the Census Basic
//! auth header on every request and turns any status other than 200 into an
//! [`HttpError`] before the body is looked at.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::auth::CensusCredentials;
use crate::config::CensusConfig;

/// HTTP error details.
#[derive(Debug, Clone)]
pub struct HttpErrorDetail {
    pub status: u16,
    pub url: String,
    pub reason: String,
    pub body_snippet: Option<String>,
}

impl std::fmt::Display for HttpErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {} for {}: {}", self.status, self.url, self.reason)?;
        if let Some(ref snippet) = self.body_snippet {
            let truncated: String = snippet.chars().take(200).collect();
            write!(f, " | body[0:200]={}", truncated)?;
        }
        Ok(())
    }
}

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request failed: {0} (is_connect={}, is_timeout={})", .0.is_connect(), .0.is_timeout())]
    Request(#[from] reqwest::Error),

    #[error("{0}")]
    Response(HttpErrorDetail),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("json parse error: {0}")]
    JsonParse(String),
}

impl HttpError {
    /// Create an HTTP error from a response.
    pub fn from_response(status: StatusCode, url: &str, body: Option<&str>) -> Self {
        let reason = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        HttpError::Response(HttpErrorDetail {
            status: status.as_u16(),
            url: url.to_string(),
            reason,
            body_snippet: body.map(|s| s.chars().take(200).collect()),
        })
    }

    /// Get the HTTP status code, if available.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Response(detail) => Some(detail.status),
            HttpError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Async HTTP client for the Census API.
///
/// Every request carries `Authorization: Basic base64("bearer:<token>")`.
/// The header is built once from the credentials and marked sensitive.
///
/// # Example
///
/// ```ignore
/// let base = urls::versioned_api_base("https://app.getcensus.com/api", "v1")?;
/// let client = HttpClient::new(base, &credentials, &CensusConfig::default())?;
/// let payload = client.get_json("sync_runs/42", None).await?;
/// ```
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client.
    ///
    /// # Arguments
    ///
    /// * `api_base` - Versioned API root (see [`crate::urls::versioned_api_base`])
    /// * `credentials` - Census access token
    /// * `config` - Timeout and User-Agent settings
    pub fn new(
        api_base: Url,
        credentials: &CensusCredentials,
        config: &CensusConfig,
    ) -> Result<Self, HttpError> {
        let mut headers = HeaderMap::new();

        let mut auth_value = HeaderValue::from_str(&credentials.basic_auth_header())
            .map_err(|_| HttpError::InvalidHeader("invalid access token characters".to_string()))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        if let Ok(val) = HeaderValue::from_str(&config.user_agent) {
            headers.insert(USER_AGENT, val);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .tcp_nodelay(true)
            .build()
            .map_err(HttpError::Request)?;

        Ok(Self {
            client,
            base_url: api_base.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Versioned API root this client sends requests to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Convert a relative path to an absolute URL.
    fn abs_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Make a GET request and return the JSON body.
    ///
    /// # Arguments
    ///
    /// * `path` - API path (relative or absolute)
    /// * `params` - Optional query parameters
    pub async fn get_json(
        &self,
        path: &str,
        params: Option<&[(&str, &str)]>,
    ) -> Result<Value, HttpError> {
        self.send(Method::GET, path, params).await
    }

    /// Make a POST request without a body and return the JSON body.
    ///
    /// # Arguments
    ///
    /// * `path` - API path (relative or absolute)
    /// * `params` - Optional query parameters
    pub async fn post_json(
        &self,
        path: &str,
        params: Option<&[(&str, &str)]>,
    ) -> Result<Value, HttpError> {
        self.send(Method::POST, path, params).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        params: Option<&[(&str, &str)]>,
    ) -> Result<Value, HttpError> {
        let url = self.abs_url(path);
        let mut req = self.client.request(method.clone(), &url);
        if let Some(p) = params {
            req = req.query(p);
        }

        debug!(method = %method, url = %url, "calling Census API");
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        debug!(method = %method, url = %url, status = status.as_u16(), "Census API responded");

        parse_json(status, &url, &body)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn parse_json(status: StatusCode, url: &str, body: &[u8]) -> Result<Value, HttpError> {
    if status != StatusCode::OK {
        let text = String::from_utf8_lossy(body);
        return Err(HttpError::from_response(
            status,
            url,
            if text.trim().is_empty() { None } else { Some(&text) },
        ));
    }

    serde_json::from_slice(body).map_err(|e| {
        let text = String::from_utf8_lossy(body);
        let snippet: String = text.chars().take(100).collect();
        HttpError::JsonParse(format!("{}: {}", e, snippet))
    })
}
