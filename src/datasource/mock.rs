//! Mock vendor source for testing without network calls.

use super::{DataSourceError, VendorSource};
use crate::domain::{Credentials, MatchStatsPayload};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

type Response = Result<Value, DataSourceError>;

/// Mock vendor source that replays scripted responses per URL.
///
/// Each URL holds a queue of responses; the last one repeats once the queue is
/// down to a single entry. Clones share the script, the call log and the gate.
#[derive(Debug, Clone, Default)]
pub struct MockVendorSource {
    responses: Arc<Mutex<HashMap<String, VecDeque<Response>>>>,
    calls: Arc<AtomicUsize>,
    seen_credentials: Arc<Mutex<Vec<Credentials>>>,
    gate: Option<Arc<Semaphore>>,
}

impl MockVendorSource {
    /// Create a new mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON body for `url`.
    pub fn with_payload(self, url: &str, body: Value) -> Self {
        self.push(url, Ok(body));
        self
    }

    /// Queue a failure for `url`.
    pub fn with_error(self, url: &str, err: DataSourceError) -> Self {
        self.push(url, Err(err));
        self
    }

    /// Hold every fetch until a permit is added to the returned semaphore.
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(gate.clone());
        (self, gate)
    }

    /// Number of fetches started so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Credentials passed on each fetch, in call order.
    pub fn seen_credentials(&self) -> Vec<Credentials> {
        self.seen_credentials
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    fn push(&self, url: &str, response: Response) {
        if let Ok(mut responses) = self.responses.lock() {
            responses
                .entry(url.to_string())
                .or_default()
                .push_back(response);
        }
    }

    fn next_response(&self, url: &str) -> Response {
        let mut responses = self
            .responses
            .lock()
            .map_err(|e| DataSourceError::Other(e.to_string()))?;
        let queue = responses
            .get_mut(url)
            .ok_or_else(|| DataSourceError::HttpError {
                status: 404,
                message: "Not Found".to_string(),
            })?;
        let next = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        next.unwrap_or_else(|| Err(DataSourceError::Other("empty script".to_string())))
    }
}

#[async_trait]
impl VendorSource for MockVendorSource {
    async fn fetch_match_stats(
        &self,
        url: &str,
        credentials: &Credentials,
    ) -> Result<MatchStatsPayload, DataSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen_credentials.lock() {
            seen.push(credentials.clone());
        }

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| DataSourceError::Other(e.to_string()))?;
            permit.forget();
        }

        let body = self.next_response(url)?;
        MatchStatsPayload::from_value(body).map_err(|e| DataSourceError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const URL: &str = "https://api.autodarts.io/as/v0/matches/abc/stats";

    #[tokio::test]
    async fn test_mock_replays_queue_then_repeats_last() {
        let mock = MockVendorSource::new()
            .with_error(URL, DataSourceError::NetworkError("down".to_string()))
            .with_payload(URL, json!({"id": "abc"}));

        let creds = Credentials::default();
        assert!(mock.fetch_match_stats(URL, &creds).await.is_err());
        let p = mock.fetch_match_stats(URL, &creds).await.unwrap();
        assert_eq!(p.id.as_deref(), Some("abc"));
        let p = mock.fetch_match_stats(URL, &creds).await.unwrap();
        assert_eq!(p.id.as_deref(), Some("abc"));
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_mock_unknown_url_is_not_found() {
        let mock = MockVendorSource::new();
        let err = mock
            .fetch_match_stats(URL, &Credentials::default())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DataSourceError::HttpError {
                status: 404,
                message: "Not Found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_mock_records_credentials() {
        let mock = MockVendorSource::new().with_payload(URL, json!({}));
        let creds = Credentials {
            cookie: Some("session=abc".to_string()),
            authorization: None,
        };
        mock.fetch_match_stats(URL, &creds).await.unwrap();
        assert_eq!(mock.seen_credentials(), vec![creds]);
    }
}
