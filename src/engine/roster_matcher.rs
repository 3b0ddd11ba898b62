//! Resolve vendor usernames against the tournament roster.

use crate::domain::{MatchResult, TournamentRosterEntry};

/// Find the roster entry whose username or display name equals `name`,
/// case-insensitively after trimming. First match in roster order wins.
pub fn match_player<'a>(
    roster: &'a [TournamentRosterEntry],
    name: &str,
) -> Option<&'a TournamentRosterEntry> {
    let needle = normalize(name);
    if needle.is_empty() {
        return None;
    }
    roster.iter().find(|entry| {
        normalize(&entry.autodarts_username) == needle || normalize(&entry.display_name) == needle
    })
}

/// Resolve both sides of a result. `None` if either player is not on the roster.
pub fn resolve_players<'a>(
    roster: &'a [TournamentRosterEntry],
    result: &MatchResult,
) -> Option<(&'a TournamentRosterEntry, &'a TournamentRosterEntry)> {
    let home = match_player(roster, &result.home_username)?;
    let away = match_player(roster, &result.away_username)?;
    Some((home, away))
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
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

    fn roster() -> Vec<TournamentRosterEntry> {
        vec![entry("Alice A", "alice"), entry("Bob B", "bob")]
    }

    fn result(home: &str, away: &str) -> MatchResult {
        MatchResult {
            home_username: home.to_string(),
            away_username: away.to_string(),
            home_user_id: None,
            away_user_id: None,
            home_legs_won: 0,
            away_legs_won: 0,
            home_average: None,
            away_average: None,
        }
    }

    #[test]
    fn test_match_is_case_insensitive_and_trimmed() {
        let roster = roster();
        assert_eq!(match_player(&roster, "  ALICE ").unwrap().autodarts_username, "alice");
        assert_eq!(match_player(&roster, "bob b").unwrap().autodarts_username, "bob");
    }

    #[test]
    fn test_roster_side_is_trimmed_too() {
        let roster = vec![entry("  Carol C  ", " CAROL ")];
        assert!(match_player(&roster, "carol").is_some());
        assert!(match_player(&roster, "carol c").is_some());
    }

    #[test]
    fn test_first_match_wins() {
        let roster = vec![entry("dup", "first"), entry("x", "dup")];
        assert_eq!(match_player(&roster, "DUP").unwrap().autodarts_username, "first");
    }

    #[test]
    fn test_no_match_on_empty_roster_or_blank_name() {
        assert!(match_player(&[], "alice").is_none());
        assert!(match_player(&roster(), "   ").is_none());
        assert!(match_player(&[entry("", "")], "").is_none());
    }

    #[test]
    fn test_resolve_players_requires_both_sides() {
        let roster = roster();
        let (home, away) = resolve_players(&roster, &result("Alice", "Bob")).unwrap();
        assert_eq!(home.autodarts_username, "alice");
        assert_eq!(away.autodarts_username, "bob");

        assert!(resolve_players(&roster, &result("Alice", "Mallory")).is_none());
        assert!(resolve_players(&roster, &result("Mallory", "Bob")).is_none());
    }
}
