//! Domain primitives: MatchId.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn stats_path_regex() -> Option<&'static Regex> {
    static STATS_PATH: OnceLock<Option<Regex>> = OnceLock::new();
    STATS_PATH
        .get_or_init(|| Regex::new(r"(?i)/matches/([0-9a-f-]+)/stats$").ok())
        .as_ref()
}

/// Identifier of one played match in the vendor system.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchId(pub String);

impl MatchId {
    /// Create a MatchId from a string.
    pub fn new(id: String) -> Self {
        MatchId(id)
    }

    /// Extract the match id from a path (or query-less URL) ending in `/matches/{id}/stats`.
    ///
    /// Returns `None` when the path does not end with the stats pattern.
    pub fn from_stats_url(url: &str) -> Option<Self> {
        stats_path_regex()?
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| MatchId(m.as_str().to_string()))
    }

    /// Get the id as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
