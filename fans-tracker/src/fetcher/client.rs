use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};

use crate::fetcher::types::StatEnvelope;
use crate::fetcher::{FetchError, FetchResult, FetcherConfig, StatSource};
use crate::logging::truncate_field;

/// Longest upstream body or message kept in an error.
const MAX_ERROR_BODY: usize = 256;

/// HTTP client for the relation statistics endpoint.
#[derive(Clone)]
pub struct StatClient {
    config: Arc<FetcherConfig>,
    client: Client,
}

impl StatClient {
    /// Create a new client with the given configuration.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent())
            .danger_accept_invalid_certs(config.accept_invalid_certs())
            .build()
            .map_err(|e| FetchError::Client {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        if config.accept_invalid_certs() {
            debug!("TLS certificate validation disabled for {}", config.endpoint());
        }

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Convert a response other than `200 OK` into a transport error.
    async fn handle_error_response(&self, response: reqwest::Response) -> FetchError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        FetchError::Transport {
            status,
            message: truncate_field(&body, MAX_ERROR_BODY),
        }
    }
}

#[async_trait]
impl StatSource for StatClient {
    #[instrument(skip(self))]
    async fn fetch(&self, id: &str) -> Result<FetchResult, FetchError> {
        let response = self
            .client
            .get(self.config.stat_url())
            .query(&[("vmid", id)])
            .send()
            .await
            .map_err(|e| FetchError::Network {
                message: e.to_string(),
            })?;

        if response.status() != StatusCode::OK {
            let err = self.handle_error_response(response).await;
            warn!("Statistics request for {} failed: {}", id, err);
            return Err(err);
        }

        let envelope = response
            .json::<StatEnvelope>()
            .await
            .map_err(|e| FetchError::Parse {
                message: e.to_string(),
            })?;

        if envelope.code != 0 {
            return Err(FetchError::Upstream {
                code: envelope.code,
                message: truncate_field(&envelope.message, MAX_ERROR_BODY),
            });
        }

        let stat = envelope.data.ok_or_else(|| FetchError::Parse {
            message: "response is missing the data object".to_string(),
        })?;

        debug!(
            mid = stat.mid,
            follower = stat.follower,
            following = stat.following,
            "Fetched relation statistics"
        );
        Ok(stat)
    }
}
