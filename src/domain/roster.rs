//! Tournament roster snapshot and active tournament context.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One player registered to the active tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentRosterEntry {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub autodarts_username: String,
    /// Backend player id; the UI stores it as `id`.
    #[serde(default, alias = "id", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Value>,
}

/// Currently selected tournament plus its roster, as read from the context store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentContext {
    /// Backend tournament id (numeric in practice, kept opaque).
    pub active_tournament_id: Option<Value>,
    #[serde(rename = "tournamentPlayers", default)]
    pub players: Vec<TournamentRosterEntry>,
}

impl TournamentContext {
    /// A tournament is active when an id is set and not null.
    pub fn is_active(&self) -> bool {
        matches!(&self.active_tournament_id, Some(v) if !v.is_null())
    }
}
