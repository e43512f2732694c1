//! iTunes lookup API implementation

use std::time::Duration;

#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{LookupConfig, USER_AGENT};
use crate::store::error::LookupError;

/// Response from the lookup endpoint
#[derive(Debug, Deserialize)]
struct LookupResponse {
    results: Vec<LookupEntry>,
}

#[derive(Debug, Deserialize)]
struct LookupEntry {
    version: Option<String>,
}

/// Trait for fetching the released version of an app
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait VersionLookup: Send + Sync {
    /// Fetches the version string published for `app_id`
    ///
    /// # Returns
    /// * `Ok(String)` - Version of the first lookup result
    /// * `Err(LookupError)` - If the request, the body or the expected fields fail
    async fn lookup_version(&self, app_id: &str) -> Result<String, LookupError>;
}

/// Lookup against the iTunes `lookup?id=` endpoint
#[derive(Clone)]
pub struct AppStoreLookup {
    client: reqwest::Client,
    base_url: String,
}

impl AppStoreLookup {
    /// Creates a lookup against a custom base URL with no request timeout
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_else(|e| {
            warn!("Failed to configure HTTP client, using defaults: {}", e);
            reqwest::Client::new()
        });

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &LookupConfig) -> Self {
        Self::with_timeout(&config.base_url, config.timeout())
    }

    fn lookup_url(&self, app_id: &str) -> Result<reqwest::Url, LookupError> {
        let endpoint = format!("{}/lookup", self.base_url);
        reqwest::Url::parse_with_params(&endpoint, &[("id", app_id)])
            .map_err(|e| LookupError::InvalidUrl(format!("{endpoint}: {e}")))
    }
}

impl Default for AppStoreLookup {
    fn default() -> Self {
        Self::from_config(&LookupConfig::default())
    }
}

#[async_trait::async_trait]
impl VersionLookup for AppStoreLookup {
    async fn lookup_version(&self, app_id: &str) -> Result<String, LookupError> {
        let url = self.lookup_url(app_id)?;
        debug!("Looking up store version: {}", url);

        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(app_id.to_string()));
        }

        if !status.is_success() {
            warn!("Lookup returned status {}: {}", status, url);
            return Err(LookupError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let body = response.bytes().await.map_err(network_error)?;
        let lookup: LookupResponse = serde_json::from_slice(&body).map_err(|e| {
            warn!("Failed to parse lookup response: {}", e);
            LookupError::InvalidResponse(e.to_string())
        })?;

        let first = lookup
            .results
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::NotFound(app_id.to_string()))?;

        first
            .version
            .ok_or_else(|| LookupError::InvalidResponse("missing version field".to_string()))
    }
}

fn network_error(err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        LookupError::Timeout
    } else {
        LookupError::Network(err)
    }
}
