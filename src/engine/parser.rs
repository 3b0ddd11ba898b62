//! Match response parser: raw vendor stats payload -> normalized `MatchResult`.

use crate::domain::{MatchResult, MatchStatsPayload, PlayerRecord, PlayerStatsEntry};
use std::collections::HashMap;

/// Parse a finished-match payload into a `MatchResult`.
///
/// Returns `None` when the payload is unusable: fewer than two players or fewer
/// than two score entries. Players are ordered by their declared `index`
/// (missing index counts as 0); array position only breaks ties. A score entry
/// belongs to the player at the same position in the vendor's `players` array.
pub fn parse_match_result(payload: &MatchStatsPayload) -> Option<MatchResult> {
    let players = payload.players.as_deref().unwrap_or_default();
    let scores = payload.scores.as_deref().unwrap_or_default();
    if players.len() < 2 || scores.len() < 2 {
        return None;
    }

    let mut ordered: Vec<(usize, &PlayerRecord)> = players.iter().enumerate().collect();
    ordered.sort_by_key(|(_, p)| p.index.unwrap_or(0));
    let (home_pos, home) = ordered[0];
    let (away_pos, away) = ordered[1];

    let stats_by_player: HashMap<&str, &PlayerStatsEntry> = payload
        .match_stats
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(|s| s.player_id.as_deref().map(|id| (id, s)))
        .collect();
    let stats_for = |p: &PlayerRecord| {
        p.id
            .as_deref()
            .and_then(|id| stats_by_player.get(id).copied())
    };
    let home_stats = stats_for(home);
    let away_stats = stats_for(away);

    Some(MatchResult {
        home_username: home.name.clone().unwrap_or_default(),
        away_username: away.name.clone().unwrap_or_default(),
        home_user_id: home.user_id.clone(),
        away_user_id: away.user_id.clone(),
        home_legs_won: legs_won(scores.get(home_pos).and_then(|s| s.legs), home_stats),
        away_legs_won: legs_won(scores.get(away_pos).and_then(|s| s.legs), away_stats),
        home_average: home_stats.and_then(|s| s.average),
        away_average: away_stats.and_then(|s| s.average),
    })
}

fn legs_won(score_legs: Option<u32>, stats: Option<&PlayerStatsEntry>) -> u32 {
    score_legs
        .or_else(|| stats.and_then(|s| s.legs_won))
        .unwrap_or(0)
}
