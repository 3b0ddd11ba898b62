//! Per-match dedup state machine gating the fetch/submit pipeline.
//!
//! Each `MatchId` is in one of three states:
//! - `Absent`: never seen, or eligible for another attempt
//! - `Pending`: an attempt is in flight; further observations are absorbed
//! - `CoolingDown`: a terminal outcome was reached; observations are absorbed
//!   until the window elapses, after which the id is `Absent` again
//!
//! Absent ids are not stored, so the map only holds in-flight and cooling ids.
//! All transitions go through [`DedupTracker::transition_at`] under one mutex;
//! the lock is never held across an await point.

use crate::domain::MatchId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Default cooling-down window after a terminal outcome.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupState {
    Absent,
    Pending,
    CoolingDown { until: Instant },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupEvent {
    /// A stats request for the id was observed.
    Observe,
    /// The re-fetch failed (transport, status, or body decode).
    FetchFailed,
    /// The re-fetched payload is not finished yet.
    Unfinished,
    /// Submitted, no fixture, no roster match, or backend error.
    TerminalOutcome,
    /// The cooling-down window has elapsed.
    Expire,
}

/// A state change applied by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: DedupState,
    pub to: DedupState,
}

impl Transition {
    /// True when this transition handed the caller a fresh pending claim.
    pub fn claimed(&self) -> bool {
        self.to == DedupState::Pending && self.from != DedupState::Pending
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DedupError {
    #[error("illegal dedup transition for match {match_id}: {event:?} from {from:?}")]
    IllegalTransition {
        match_id: MatchId,
        from: DedupState,
        event: DedupEvent,
    },
}

/// Process-wide dedup map. Create once and share as `Arc<DedupTracker>`.
#[derive(Debug)]
pub struct DedupTracker {
    entries: Mutex<HashMap<MatchId, DedupState>>,
    cooldown: Duration,
}

impl DedupTracker {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            cooldown,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Atomically move an absent id to pending.
    ///
    /// Returns `false` (and changes nothing) if the id is already pending or
    /// still cooling down.
    pub fn try_claim(&self, match_id: &MatchId) -> bool {
        self.try_claim_at(match_id, Instant::now())
    }

    pub fn try_claim_at(&self, match_id: &MatchId, now: Instant) -> bool {
        self.transition_at(match_id, DedupEvent::Observe, now)
            .map(|t| t.claimed())
            .unwrap_or(false)
    }

    pub fn transition(
        &self,
        match_id: &MatchId,
        event: DedupEvent,
    ) -> Result<Transition, DedupError> {
        self.transition_at(match_id, event, Instant::now())
    }

    /// Apply `event` to `match_id` at time `now`.
    ///
    /// An elapsed cooling-down entry is expired before `Observe` is applied, so
    /// an id becomes claimable again once its window is over.
    pub fn transition_at(
        &self,
        match_id: &MatchId,
        event: DedupEvent,
        now: Instant,
    ) -> Result<Transition, DedupError> {
        let mut entries = self.lock();
        self.apply(&mut entries, match_id, event, now)
    }

    fn apply(
        &self,
        entries: &mut HashMap<MatchId, DedupState>,
        match_id: &MatchId,
        event: DedupEvent,
        now: Instant,
    ) -> Result<Transition, DedupError> {
        let from = entries
            .get(match_id)
            .copied()
            .unwrap_or(DedupState::Absent);

        let to = match (from, event) {
            (DedupState::Absent, DedupEvent::Observe) => DedupState::Pending,
            (DedupState::CoolingDown { until }, DedupEvent::Observe) if now >= until => {
                DedupState::Pending
            }
            // Absorbed: not queued, not an error.
            (DedupState::Pending, DedupEvent::Observe)
            | (DedupState::CoolingDown { .. }, DedupEvent::Observe) => from,
            (DedupState::Pending, DedupEvent::FetchFailed)
            | (DedupState::Pending, DedupEvent::Unfinished) => DedupState::Absent,
            (DedupState::Pending, DedupEvent::TerminalOutcome) => DedupState::CoolingDown {
                until: now + self.cooldown,
            },
            (DedupState::CoolingDown { until }, DedupEvent::Expire) if now >= until => {
                DedupState::Absent
            }
            _ => {
                return Err(DedupError::IllegalTransition {
                    match_id: match_id.clone(),
                    from,
                    event,
                })
            }
        };

        match to {
            DedupState::Absent => {
                entries.remove(match_id);
            }
            _ => {
                entries.insert(match_id.clone(), to);
            }
        }

        if from != to {
            debug!(match_id = %match_id, ?event, ?from, ?to, "dedup transition");
        }
        Ok(Transition { from, to })
    }

    /// Logical state of `match_id` at `now` (elapsed cooldowns read as absent).
    pub fn state_at(&self, match_id: &MatchId, now: Instant) -> DedupState {
        match self.lock().get(match_id).copied() {
            None => DedupState::Absent,
            Some(DedupState::CoolingDown { until }) if now >= until => DedupState::Absent,
            Some(state) => state,
        }
    }

    pub fn state(&self, match_id: &MatchId) -> DedupState {
        self.state_at(match_id, Instant::now())
    }

    /// Expire every cooling-down entry whose window has elapsed. Returns the count removed.
    pub fn sweep_expired_at(&self, now: Instant) -> usize {
        let mut entries = self.lock();
        let elapsed: Vec<MatchId> = entries
            .iter()
            .filter(|(_, state)| matches!(state, DedupState::CoolingDown { until } if now >= *until))
            .map(|(id, _)| id.clone())
            .collect();
        elapsed
            .iter()
            .filter(|id| self.apply(&mut entries, id, DedupEvent::Expire, now).is_ok())
            .count()
    }

    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Instant::now())
    }

    /// Number of tracked (pending or cooling-down) ids.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<MatchId, DedupState>> {
        // Every write is a single insert or remove, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DedupTracker {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

/// Periodically expire elapsed cooling-down entries to bound memory.
pub fn spawn_sweeper(tracker: Arc<DedupTracker>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let expired = tracker.sweep_expired();
            if expired > 0 {
                info!(expired, remaining = tracker.len(), "Expired cooling-down matches");
            }
        }
    })
}
