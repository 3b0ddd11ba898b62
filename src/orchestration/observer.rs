use crate::backend::{LeagueBackend, SubmissionOutcome};
use crate::datasource::VendorSource;
use crate::db::{load_tournament_context, ContextStore};
use crate::domain::{MatchId, RequestCompleted, SubmissionPayload};
use crate::engine::{parse_match_result, resolve_players, DedupEvent, DedupTracker};
use crate::notify::{Notification, Notifier};
use reqwest::Url;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// What happened to one claimed match.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// Re-fetch failed (transport, status, or body decode).
    FetchFailed,
    /// The match has not finished yet.
    Unfinished,
    /// Finished, but the payload lacks two players or two score entries.
    Unusable,
    /// The context store could not be read.
    ContextUnavailable,
    NoActiveTournament,
    PlayersNotInTournament {
        home_username: String,
        away_username: String,
    },
    /// The backend has no pending fixture for this pairing.
    NoFixture,
    /// A fixture was resolved; carries the backend response.
    Submitted(Value),
    BackendFailed,
}

impl PipelineOutcome {
    /// Dedup transition that closes out the pending claim.
    ///
    /// Failures that may self-correct on a later poll release the id; every
    /// business outcome and backend failure starts the cooling-down window.
    pub fn dedup_event(&self) -> DedupEvent {
        match self {
            PipelineOutcome::FetchFailed
            | PipelineOutcome::Unusable
            | PipelineOutcome::ContextUnavailable => DedupEvent::FetchFailed,
            PipelineOutcome::Unfinished => DedupEvent::Unfinished,
            PipelineOutcome::NoActiveTournament
            | PipelineOutcome::PlayersNotInTournament { .. }
            | PipelineOutcome::NoFixture
            | PipelineOutcome::Submitted(_)
            | PipelineOutcome::BackendFailed => DedupEvent::TerminalOutcome,
        }
    }
}

/// Entry point of the pipeline: watches completed vendor requests and turns
/// each newly finished match into exactly one backend submission.
#[derive(Clone)]
pub struct NetworkObserver {
    vendor: Arc<dyn VendorSource>,
    backend: Arc<dyn LeagueBackend>,
    store: Arc<dyn ContextStore>,
    tracker: Arc<DedupTracker>,
    notifier: Notifier,
    vendor_origin: Option<Url>,
}

impl NetworkObserver {
    pub fn new(
        vendor: Arc<dyn VendorSource>,
        backend: Arc<dyn LeagueBackend>,
        store: Arc<dyn ContextStore>,
        tracker: Arc<DedupTracker>,
        notifier: Notifier,
    ) -> Self {
        Self {
            vendor,
            backend,
            store,
            tracker,
            notifier,
            vendor_origin: None,
        }
    }

    /// Only accept events whose URL shares this origin.
    pub fn with_vendor_origin(mut self, origin: Url) -> Self {
        self.vendor_origin = Some(origin);
        self
    }

    pub fn tracker(&self) -> &Arc<DedupTracker> {
        &self.tracker
    }

    /// Return the match id if `url` is a stats request on the vendor origin.
    pub fn stats_match_id(&self, url: &str) -> Option<MatchId> {
        let parsed = Url::parse(url).ok()?;
        if let Some(origin) = &self.vendor_origin {
            if parsed.origin() != origin.origin() {
                return None;
            }
        }
        MatchId::from_stats_url(parsed.path())
    }

    /// Handle one completed request.
    ///
    /// The dedup claim happens here, synchronously, before anything is
    /// spawned. Returns the pipeline task when this event started a new
    /// attempt, `None` when it was filtered out or absorbed.
    pub fn handle_event(&self, event: RequestCompleted) -> Option<JoinHandle<PipelineOutcome>> {
        let match_id = self.stats_match_id(&event.url)?;
        if !self.tracker.try_claim(&match_id) {
            debug!(match_id = %match_id, "Stats request absorbed");
            return None;
        }

        info!(match_id = %match_id, url = %event.url, "Detected stats request");
        let observer = self.clone();
        Some(tokio::spawn(async move {
            observer.process_claimed(match_id, event).await
        }))
    }

    /// Drain events until the channel closes.
    pub async fn run(self, mut events: mpsc::Receiver<RequestCompleted>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event);
        }
        info!("Observer event channel closed");
    }

    /// Run the pipeline for an id this caller has claimed, then release or
    /// cool down the claim according to the outcome.
    pub async fn process_claimed(
        &self,
        match_id: MatchId,
        event: RequestCompleted,
    ) -> PipelineOutcome {
        let outcome = self.run_pipeline(&match_id, &event).await;
        if let Err(e) = self.tracker.transition(&match_id, outcome.dedup_event()) {
            error!(match_id = %match_id, error = %e, "Failed to settle dedup state");
        }
        outcome
    }

    async fn run_pipeline(&self, match_id: &MatchId, event: &RequestCompleted) -> PipelineOutcome {
        let stats = match self
            .vendor
            .fetch_match_stats(&event.url, &event.credentials)
            .await
        {
            Ok(stats) => stats,
            Err(e) => {
                warn!(match_id = %match_id, error = %e, "Failed to re-fetch stats");
                return PipelineOutcome::FetchFailed;
            }
        };

        if !stats.is_finished() {
            debug!(match_id = %match_id, "Match still in progress");
            return PipelineOutcome::Unfinished;
        }

        let game_id = stats.id.clone().unwrap_or_else(|| match_id.to_string());
        info!(match_id = %match_id, game_id = %game_id, "Finished match");

        let Some(result) = parse_match_result(&stats) else {
            warn!(match_id = %match_id, "Could not extract result from stats payload");
            return PipelineOutcome::Unusable;
        };
        debug!(match_id = %match_id, ?result, "Extracted result");

        let context = match load_tournament_context(self.store.as_ref()).await {
            Ok(context) => context,
            Err(e) => {
                error!(match_id = %match_id, error = %e, "Failed to read tournament context");
                return PipelineOutcome::ContextUnavailable;
            }
        };
        if !context.is_active() {
            info!(match_id = %match_id, "No active tournament, skipping");
            return PipelineOutcome::NoActiveTournament;
        }

        let Some((home, away)) = resolve_players(&context.players, &result) else {
            let roster: Vec<&str> = context
                .players
                .iter()
                .map(|p| p.autodarts_username.as_str())
                .collect();
            info!(
                match_id = %match_id,
                home = %result.home_username,
                away = %result.away_username,
                roster = %roster.join(", "),
                "Players not in tournament"
            );
            self.notifier.notify(Notification::PlayersNotInTournament {
                home_username: result.home_username.clone(),
                away_username: result.away_username.clone(),
            });
            return PipelineOutcome::PlayersNotInTournament {
                home_username: result.home_username,
                away_username: result.away_username,
            };
        };

        let submission = SubmissionPayload::from_result(&result, home, away, &game_id);
        info!(match_id = %match_id, ?submission, "Submitting to backend");

        match self.backend.submit_game_result(&submission).await {
            Ok(SubmissionOutcome::NoFixture) => {
                info!(match_id = %match_id, "No matching pending fixture found");
                PipelineOutcome::NoFixture
            }
            Ok(SubmissionOutcome::Matched(fixture)) => {
                info!(match_id = %match_id, %fixture, "Fixture updated");
                self.notifier.notify(Notification::GameDetected {
                    fixture: fixture.clone(),
                });
                PipelineOutcome::Submitted(fixture)
            }
            Err(e) => {
                error!(match_id = %match_id, error = %e, "Backend call failed");
                PipelineOutcome::BackendFailed
            }
        }
    }
}

impl std::fmt::Debug for NetworkObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkObserver")
            .field("vendor", &self.vendor)
            .field("backend", &self.backend)
            .field("vendor_origin", &self.vendor_origin)
            .finish_non_exhaustive()
    }
}
