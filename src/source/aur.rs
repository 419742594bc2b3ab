//! AUR RPC adapter
//!
//! Fetches package metadata from the AUR RPC interface.
//! API endpoint: https://aur.archlinux.org/rpc?v=5&type=info&arg[]={package}

use crate::domain::ForeignPackage;
use crate::error::SourceError;
use crate::source::{ForeignIndex, HttpClient};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// AUR base URL
pub const AUR_URL: &str = "https://aur.archlinux.org";

/// Longest request URI the AUR accepts
const AUR_RPC_MAX_URI: usize = 4400;

/// AUR RPC adapter
pub struct AurClient {
    client: HttpClient,
    base_url: String,
}

/// AUR RPC response envelope
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    results: Vec<RpcPackage>,
}

/// Package entry of an info response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RpcPackage {
    name: String,
    version: String,
    last_modified: i64,
}

impl AurClient {
    /// Create a new AUR client against the public AUR
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, AUR_URL)
    }

    /// Create a client against a different AUR instance
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the info URL for one chunk of names
    fn build_url(&self, names: &[String]) -> Result<Url, SourceError> {
        let mut url = Url::parse(&format!("{}/rpc", self.base_url))
            .map_err(|e| SourceError::network(self.source_name(), e.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("v", "5").append_pair("type", "info");
            for name in names {
                query.append_pair("arg[]", name);
            }
        }
        Ok(url)
    }
}

/// Split names into chunks whose request URI stays under the AUR limit
fn chunk_names(names: &[String]) -> Vec<&[String]> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut len = 0;

    for (i, name) in names.iter().enumerate() {
        // "&arg%5B%5D=" plus the name
        let add = 11 + name.len();
        if len + add > AUR_RPC_MAX_URI && i > start {
            chunks.push(&names[start..i]);
            start = i;
            len = 0;
        }
        len += add;
    }

    if start < names.len() {
        chunks.push(&names[start..]);
    }

    chunks
}

fn into_packages(response: RpcResponse) -> Result<Vec<ForeignPackage>, SourceError> {
    if response.kind == "error" {
        return Err(SourceError::invalid_response(
            "AUR",
            response.error.unwrap_or_else(|| "unknown error".to_string()),
        ));
    }

    Ok(response
        .results
        .into_iter()
        .filter_map(|p| {
            let last_modified = DateTime::from_timestamp(p.last_modified, 0)?;
            Some(ForeignPackage::new(p.name, p.version, last_modified))
        })
        .collect())
}

#[async_trait]
impl ForeignIndex for AurClient {
    fn source_name(&self) -> &'static str {
        "AUR"
    }

    async fn info(&self, names: &[String]) -> Result<HashMap<String, ForeignPackage>, SourceError> {
        let mut found = HashMap::new();

        for chunk in chunk_names(names) {
            let url = self.build_url(chunk)?;
            debug!(count = chunk.len(), "querying AUR");
            let response: RpcResponse = self
                .client
                .get_json(url.as_str(), self.source_name())
                .await?;

            for package in into_packages(response)? {
                found.insert(package.name.clone(), package);
            }
        }

        Ok(found)
    }
}
