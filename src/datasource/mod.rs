//! Data source abstraction for re-fetching vendor match statistics.

use crate::domain::{Credentials, MatchStatsPayload};
use async_trait::async_trait;
use std::fmt;

pub mod autodarts;
pub mod mock;

pub use autodarts::AutodartsDataSource;
pub use mock::MockVendorSource;

/// Vendor source trait for re-fetching an observed stats URL.
///
/// The observed event only proves that a request happened; implementations
/// issue the same GET again to obtain the body.
#[async_trait]
pub trait VendorSource: Send + Sync + fmt::Debug {
    /// Fetch and decode the stats payload at `url`.
    ///
    /// # Arguments
    /// * `url` - The observed `/matches/{id}/stats` URL
    /// * `credentials` - Ambient credentials to forward unchanged
    ///
    /// # Returns
    /// The decoded payload, finished or not. Every error is retryable from the
    /// caller's point of view.
    async fn fetch_match_stats(
        &self,
        url: &str,
        credentials: &Credentials,
    ) -> Result<MatchStatsPayload, DataSourceError>;
}

/// Error type for data source operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourceError {
    /// Network error (e.g., connection timeout, DNS failure)
    NetworkError(String),
    /// Non-success HTTP status
    HttpError { status: u16, message: String },
    /// Parsing error (invalid JSON or malformed response)
    ParseError(String),
    /// Rate limit exceeded
    RateLimited,
    /// Other error
    Other(String),
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DataSourceError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            DataSourceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DataSourceError::RateLimited => write!(f, "Rate limited"),
            DataSourceError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for DataSourceError {}
