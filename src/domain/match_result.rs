//! Normalized match result and the record submitted to the league backend.

use super::TournamentRosterEntry;
use serde::{Deserialize, Serialize};

/// Result of one finished match, in canonical home/away order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub home_username: String,
    pub away_username: String,
    pub home_user_id: Option<String>,
    pub away_user_id: Option<String>,
    pub home_legs_won: u32,
    pub away_legs_won: u32,
    pub home_average: Option<f64>,
    pub away_average: Option<f64>,
}

/// Body of `POST /autodarts/game-result`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub home_player_username: String,
    pub away_player_username: String,
    pub home_player_user_id: Option<String>,
    pub away_player_user_id: Option<String>,
    pub home_legs_won: u32,
    pub away_legs_won: u32,
    pub home_player_average: Option<f64>,
    pub away_player_average: Option<f64>,
    pub autodarts_game_id: String,
}

impl SubmissionPayload {
    /// Build the wire record from a parsed result and its two resolved roster entries.
    ///
    /// Usernames come from the roster (the backend keys players by them); ids, legs
    /// and averages come from the vendor result.
    pub fn from_result(
        result: &MatchResult,
        home: &TournamentRosterEntry,
        away: &TournamentRosterEntry,
        game_id: &str,
    ) -> Self {
        Self {
            home_player_username: home.autodarts_username.clone(),
            away_player_username: away.autodarts_username.clone(),
            home_player_user_id: result.home_user_id.clone(),
            away_player_user_id: result.away_user_id.clone(),
            home_legs_won: result.home_legs_won,
            away_legs_won: result.away_legs_won,
            home_player_average: result.home_average,
            away_player_average: result.away_average,
            autodarts_game_id: game_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(display: &str, username: &str) -> TournamentRosterEntry {
        TournamentRosterEntry {
            display_name: display.to_string(),
            autodarts_username: username.to_string(),
            account_id: None,
        }
    }

    #[test]
    fn test_submission_payload_wire_shape() {
        let result = MatchResult {
            home_username: "Alice".to_string(),
            away_username: "Bob".to_string(),
            home_user_id: Some("u-alice".to_string()),
            away_user_id: None,
            home_legs_won: 1,
            away_legs_won: 3,
            home_average: Some(40.1),
            away_average: None,
        };
        let payload =
            SubmissionPayload::from_result(&result, &entry("Alice A", "alice"), &entry("Bob B", "bob"), "m1");
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["homePlayerUsername"], "alice");
        assert_eq!(json["awayPlayerUsername"], "bob");
        assert_eq!(json["homePlayerUserId"], "u-alice");
        assert!(json["awayPlayerUserId"].is_null());
        assert_eq!(json["homeLegsWon"], 1);
        assert_eq!(json["awayLegsWon"], 3);
        assert_eq!(json["homePlayerAverage"], 40.1);
        assert!(json["awayPlayerAverage"].is_null());
        assert_eq!(json["autodartsGameId"], "m1");
    }
}
