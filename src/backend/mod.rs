//! League scheduling backend: result submission and health probe.

use crate::domain::SubmissionPayload;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

pub mod http;
pub mod mock;

pub use http::HttpLeagueBackend;
pub use mock::MockLeagueBackend;

/// How the backend answered a result submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// A pending fixture was resolved; carries the response body verbatim.
    Matched(Value),
    /// The backend reported `matched: false`: no scheduled fixture for these players.
    NoFixture,
}

impl SubmissionOutcome {
    /// Interpret a decoded response body. Only an explicit `matched: false` means no fixture.
    pub fn from_response(body: Value) -> Self {
        match body.get("matched") {
            Some(Value::Bool(false)) => SubmissionOutcome::NoFixture,
            _ => SubmissionOutcome::Matched(body),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("backend network error: {0}")]
    Network(String),
    #[error("backend HTTP error {status}: {message}")]
    Http { status: u16, message: String },
    #[error("backend response parse error: {0}")]
    Parse(String),
}

/// Scheduling backend consumed by the pipeline.
#[async_trait]
pub trait LeagueBackend: Send + Sync + fmt::Debug {
    /// Submit one finished match to the result-ingestion endpoint.
    async fn submit_game_result(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionOutcome, BackendError>;

    /// Lightweight liveness probe. Never errors; unreachable means `false`.
    async fn ping(&self) -> bool;
}
