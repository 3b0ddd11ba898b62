//! Mock league backend recording submissions.

use super::{BackendError, LeagueBackend, SubmissionOutcome};
use crate::domain::SubmissionPayload;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Mock backend returning a fixed answer and recording every payload.
#[derive(Debug, Clone)]
pub struct MockLeagueBackend {
    answer: Result<SubmissionOutcome, BackendError>,
    online: bool,
    submissions: Arc<Mutex<Vec<SubmissionPayload>>>,
}

impl MockLeagueBackend {
    /// Backend that resolves every submission to `fixture`.
    pub fn matching(fixture: serde_json::Value) -> Self {
        Self::answering(Ok(SubmissionOutcome::Matched(fixture)))
    }

    /// Backend that never finds a pending fixture.
    pub fn no_fixture() -> Self {
        Self::answering(Ok(SubmissionOutcome::NoFixture))
    }

    /// Backend whose submissions fail with `err`.
    pub fn failing(err: BackendError) -> Self {
        Self::answering(Err(err))
    }

    fn answering(answer: Result<SubmissionOutcome, BackendError>) -> Self {
        Self {
            answer,
            online: true,
            submissions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn offline(mut self) -> Self {
        self.online = false;
        self
    }

    /// Payloads received so far, in order.
    pub fn submissions(&self) -> Vec<SubmissionPayload> {
        self.submissions
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LeagueBackend for MockLeagueBackend {
    async fn submit_game_result(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionOutcome, BackendError> {
        if let Ok(mut submissions) = self.submissions.lock() {
            submissions.push(payload.clone());
        }
        self.answer.clone()
    }

    async fn ping(&self) -> bool {
        self.online
    }
}
