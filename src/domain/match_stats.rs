//! Wire shape of the vendor's `/matches/{id}/stats` response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw finished-match payload as returned by the vendor stats endpoint.
///
/// Only the fields the pipeline consumes are modelled; everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStatsPayload {
    #[serde(default)]
    pub id: Option<String>,
    /// Presence (and truthiness) marks the match as finished.
    #[serde(default)]
    pub finished_at: Option<Value>,
    #[serde(default)]
    pub players: Option<Vec<PlayerRecord>>,
    /// Positional: `scores[i]` belongs to `players[i]` as sent, before any reordering by index.
    #[serde(default)]
    pub scores: Option<Vec<ScoreEntry>>,
    #[serde(default)]
    pub match_stats: Option<Vec<PlayerStatsEntry>>,
}

impl MatchStatsPayload {
    /// Decode a payload from an arbitrary JSON value.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Whether the vendor has marked this match as finished.
    pub fn is_finished(&self) -> bool {
        match &self.finished_at {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64() != Some(0.0),
            Some(_) => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub index: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    /// Vendor account id; absent for local/guest players.
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    #[serde(default)]
    pub legs: Option<u32>,
    #[serde(default)]
    pub sets: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatsEntry {
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub average: Option<f64>,
    #[serde(default)]
    pub legs_won: Option<u32>,
}
