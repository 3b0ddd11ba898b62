pub mod api;
pub mod backend;
pub mod config;
pub mod datasource;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod notify;
pub mod orchestration;

pub use backend::{HttpLeagueBackend, LeagueBackend, MockLeagueBackend, SubmissionOutcome};
pub use config::Config;
pub use datasource::{AutodartsDataSource, DataSourceError, MockVendorSource, VendorSource};
pub use db::{init_db, ContextStore, MemoryContextStore, SqliteContextStore};
pub use domain::{
    Credentials, MatchId, MatchResult, MatchStatsPayload, RequestCompleted, SubmissionPayload,
    TournamentContext, TournamentRosterEntry,
};
pub use engine::{DedupState, DedupTracker};
pub use error::AppError;
pub use notify::{Notification, Notifier};
pub use orchestration::{NetworkObserver, PipelineOutcome};
