//! Autodarts stats endpoint client.

use super::{DataSourceError, VendorSource};
use crate::domain::{Credentials, MatchStatsPayload};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, COOKIE};
use reqwest::{Client, StatusCode};
use tracing::debug;

/// Re-fetches vendor stats URLs over HTTP, forwarding the observed credentials.
///
/// No retry here: a failed fetch reverts the match to absent and the vendor's
/// own polling re-triggers detection.
#[derive(Debug, Clone)]
pub struct AutodartsDataSource {
    client: Client,
}

impl AutodartsDataSource {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for AutodartsDataSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VendorSource for AutodartsDataSource {
    async fn fetch_match_stats(
        &self,
        url: &str,
        credentials: &Credentials,
    ) -> Result<MatchStatsPayload, DataSourceError> {
        debug!("Re-fetching stats url={}", url);

        let mut request = self.client.get(url);
        if let Some(cookie) = &credentials.cookie {
            request = request.header(COOKIE, cookie);
        }
        if let Some(authorization) = &credentials.authorization {
            request = request.header(AUTHORIZATION, authorization);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DataSourceError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(DataSourceError::RateLimited);
        }
        if !status.is_success() {
            return Err(DataSourceError::HttpError {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("Unexpected status")
                    .to_string(),
            });
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| DataSourceError::ParseError(e.to_string()))?;

        parse_stats_body(body)
    }
}

fn parse_stats_body(body: serde_json::Value) -> Result<MatchStatsPayload, DataSourceError> {
    if !body.is_object() {
        return Err(DataSourceError::ParseError(
            "Expected object response".to_string(),
        ));
    }
    MatchStatsPayload::from_value(body).map_err(|e| DataSourceError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stats_body_valid() {
        let body = serde_json::json!({
            "id": "m1",
            "finishedAt": "2026-02-02T10:00:00Z",
            "players": [{"id": "a", "index": 0, "name": "Alice"}],
            "scores": [{"legs": 2}]
        });
        let payload = parse_stats_body(body).unwrap();
        assert_eq!(payload.id.as_deref(), Some("m1"));
        assert!(payload.is_finished());
    }

    #[test]
    fn test_parse_stats_body_rejects_non_object() {
        let err = parse_stats_body(serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(err, DataSourceError::ParseError(_)));
    }

    #[test]
    fn test_parse_stats_body_rejects_wrong_types() {
        let err = parse_stats_body(serde_json::json!({"players": "nope"})).unwrap_err();
        assert!(matches!(err, DataSourceError::ParseError(_)));
    }
}
