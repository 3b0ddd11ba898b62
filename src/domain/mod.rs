//! Domain types for the league result pipeline.
//!
//! This module provides:
//! - `MatchId`, the vendor match identifier extracted from stats URLs
//! - Inbound request-completed events and their pass-through credentials
//! - The vendor stats payload wire shape
//! - Normalized `MatchResult` and the backend `SubmissionPayload`
//! - Roster and active tournament context snapshots

pub mod event;
pub mod match_result;
pub mod match_stats;
pub mod primitives;
pub mod roster;

pub use event::{Credentials, RequestCompleted};
pub use match_result::{MatchResult, SubmissionPayload};
pub use match_stats::{MatchStatsPayload, PlayerRecord, PlayerStatsEntry, ScoreEntry};
pub use primitives::MatchId;
pub use roster::{TournamentContext, TournamentRosterEntry};
