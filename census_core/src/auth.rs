//! Credentials for the Census API.
//!
//! This module provides:
//! - [`CensusCredentials`], an immutable holder for the access token
//! - Token resolution from the environment
//! - The Basic auth header Census expects (`bearer:<token>`)

use base64::{engine::general_purpose, Engine as _};
use secrecy::{ExposeSecret, SecretString};
use std::env;

/// Default environment variable for the access token
pub const ENV_ACCESS_TOKEN: &str = "CENSUS_ACCESS_TOKEN";

/// Fallback environment variable for the access token
pub const ENV_API_KEY: &str = "CENSUS_API_KEY";

/// Username Census expects in the Basic auth header.
pub const BASIC_AUTH_USERNAME: &str = "bearer";

/// Access token used to authenticate against Census.
///
/// The token is kept in a [`SecretString`] and is only exposed when the
/// authorization header is built. `Debug` output is redacted.
#[derive(Clone)]
pub struct CensusCredentials {
    access_token: SecretString,
}

impl CensusCredentials {
    /// Create credentials from a plaintext access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
        }
    }

    /// Create credentials from the environment.
    ///
    /// Resolution order:
    /// 1. `CENSUS_ACCESS_TOKEN`
    /// 2. `CENSUS_API_KEY`
    pub fn from_env() -> Option<Self> {
        get_access_token_from_env(None)
            .or_else(|| get_access_token_from_env(Some(ENV_API_KEY)))
            .map(Self::new)
    }

    /// The secret access token.
    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    /// Build the `Authorization` header value for these credentials.
    pub(crate) fn basic_auth_header(&self) -> String {
        basic_auth_value(BASIC_AUTH_USERNAME, self.access_token.expose_secret())
    }
}

impl std::fmt::Debug for CensusCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CensusCredentials")
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl From<SecretString> for CensusCredentials {
    fn from(access_token: SecretString) -> Self {
        Self { access_token }
    }
}

/// Get the access token from an environment variable.
///
/// # Arguments
///
/// * `env_key` - Environment variable name (defaults to CENSUS_ACCESS_TOKEN)
pub fn get_access_token_from_env(env_key: Option<&str>) -> Option<String> {
    let key = env_key.unwrap_or(ENV_ACCESS_TOKEN);
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn basic_auth_value(username: &str, password: &str) -> String {
    let encoded = general_purpose::STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}

/// Mask a secret for display, keeping the first 4 characters.
pub fn mask_str(s: &str) -> String {
    let count = s.chars().count();
    if count <= 8 {
        "*".repeat(count)
    } else {
        let head: String = s.chars().take(4).collect();
        format!("{}...", head)
    }
}
