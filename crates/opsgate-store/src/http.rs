//! HTTP grant source for the authenticated session permission endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::error::{FetchError, FetchResult};
use crate::traits::{GrantRecord, GrantSource, GrantsPayload};

/// Configuration for [`HttpGrantSource`].
#[derive(Debug, Clone)]
pub struct HttpGrantSourceConfig {
    /// Full URL of the session permission endpoint.
    pub endpoint: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl HttpGrantSourceConfig {
    /// Creates a configuration for an endpoint with the default timeout.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Sets the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// [`GrantSource`] backed by the session's HTTP permission endpoint.
///
/// Status mapping: 401 means the session is expired or absent
/// (`Unauthorized`); any other non-success status is `Server`; connection
/// and body failures are `Transport`. All of them read as "no permissions
/// available" for guard purposes.
#[derive(Debug, Clone)]
pub struct HttpGrantSource {
    client: reqwest::Client,
    config: HttpGrantSourceConfig,
}

impl HttpGrantSource {
    /// Creates a source for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the underlying HTTP client cannot be built.
    pub fn new(config: HttpGrantSourceConfig) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| FetchError::Transport {
                message: e.to_string(),
            })?;
        Ok(Self { client, config })
    }

    /// Returns the configuration for this source.
    pub fn config(&self) -> &HttpGrantSourceConfig {
        &self.config
    }
}

#[async_trait]
impl GrantSource for HttpGrantSource {
    async fn fetch_grants(&self) -> FetchResult<Vec<GrantRecord>> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthorized);
        }
        if !status.is_success() {
            return Err(FetchError::Server {
                status: status.as_u16(),
            });
        }

        let payload: GrantsPayload =
            response.json().await.map_err(|e| FetchError::Transport {
                message: format!("invalid grants payload: {e}"),
            })?;
        Ok(payload.effective_permissions)
    }
}
