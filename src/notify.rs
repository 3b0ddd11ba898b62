//! Fire-and-forget notifications to listening views.

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};

/// Message broadcast to views; serialized with a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Notification {
    /// A fixture was resolved; the backend response is forwarded verbatim.
    GameDetected { fixture: Value },
    /// A finished match involved players outside the active roster.
    #[serde(rename_all = "camelCase")]
    PlayersNotInTournament {
        home_username: String,
        away_username: String,
    },
}

impl Notification {
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::GameDetected { .. } => "GAME_DETECTED",
            Notification::PlayersNotInTournament { .. } => "PLAYERS_NOT_IN_TOURNAMENT",
        }
    }
}

/// Broadcast hub for notifications. Cloning shares the channel.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Send to every current listener. Having no listener is not an error.
    pub fn notify(&self, notification: Notification) {
        match self.tx.send(notification) {
            Ok(count) => debug!("Notification delivered to {} listeners", count),
            Err(_) => debug!("No notification listeners"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// SSE stream of notifications; the event name is the notification type.
    pub fn sse(&self) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
        let stream = BroadcastStream::new(self.subscribe()).filter_map(|result| async move {
            match result {
                Ok(notification) => Event::default()
                    .event(notification.kind())
                    .json_data(&notification)
                    .map_err(|e| warn!("Failed to encode notification: {}", e))
                    .ok()
                    .map(Ok),
                Err(e) => {
                    // Lagged receivers skip ahead; nothing to replay.
                    warn!("Notification stream error: {:?}", e);
                    None
                }
            }
        });

        Sse::new(stream).keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(15))
                .text("keep-alive"),
        )
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(64)
    }
}
