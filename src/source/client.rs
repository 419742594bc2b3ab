//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Status and timeout mapping onto [`SourceError`]
//!
//! Every call issues exactly one request. Callers decide what a failure means.

use crate::error::SourceError;
use reqwest::Client;
use std::time::Duration;

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("aurup/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper over a configured reqwest client
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, SourceError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                SourceError::network("HTTP client", format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    /// Perform a GET request, mapping transport and status failures
    pub async fn get(&self, url: &str, source_name: &str) -> Result<reqwest::Response, SourceError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::timeout(source_name)
            } else {
                SourceError::network(source_name, e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::network(source_name, format!("HTTP {}", status)));
        }

        Ok(response)
    }

    /// Perform a GET request and parse the JSON body
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        source_name: &str,
    ) -> Result<T, SourceError> {
        let response = self.get(url, source_name).await?;

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::timeout(source_name)
            } else {
                SourceError::invalid_response(source_name, format!("failed to parse JSON: {}", e))
            }
        })
    }
}
