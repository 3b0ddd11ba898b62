//! HTTP client for the league backend REST API.

use super::{BackendError, LeagueBackend, SubmissionOutcome};
use crate::domain::SubmissionPayload;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for the health probe.
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct HttpLeagueBackend {
    client: Client,
    base_url: String,
    ping_timeout: Duration,
}

impl HttpLeagueBackend {
    /// Create a client for `base_url` (e.g. `http://localhost:8080/api`).
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            ping_timeout: DEFAULT_PING_TIMEOUT,
        }
    }

    pub fn with_ping_timeout(mut self, timeout: Duration) -> Self {
        self.ping_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl LeagueBackend for HttpLeagueBackend {
    async fn submit_game_result(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionOutcome, BackendError> {
        let url = format!("{}/autodarts/game-result", self.base_url);
        debug!("Submitting game result to {}", url);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        Ok(SubmissionOutcome::from_response(body))
    }

    async fn ping(&self) -> bool {
        let url = format!("{}/players", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(self.ping_timeout)
            .send()
            .await
        {
            Ok(_) => true,
            Err(e) => {
                warn!("Backend ping failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let backend = HttpLeagueBackend::new("http://localhost:8080/api/".to_string());
        assert_eq!(backend.base_url(), "http://localhost:8080/api");
    }

    #[tokio::test]
    async fn test_ping_unreachable_is_false() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let backend = HttpLeagueBackend::new("http://127.0.0.1:9".to_string())
            .with_ping_timeout(Duration::from_millis(200));
        assert!(!backend.ping().await);
    }
}
