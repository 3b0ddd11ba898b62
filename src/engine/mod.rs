//! Pure computation and state for the match-result pipeline.

pub mod dedup;
pub mod parser;
pub mod roster_matcher;

pub use dedup::{
    spawn_sweeper, DedupError, DedupEvent, DedupState, DedupTracker, Transition, DEFAULT_COOLDOWN,
};
pub use parser::parse_match_result;
pub use roster_matcher::{match_player, resolve_players};
