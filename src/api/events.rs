use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use axum::Json;
use futures::stream::Stream;
use serde::Serialize;
use std::convert::Infallible;
use tracing::debug;

use super::AppState;
use crate::domain::RequestCompleted;
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAck {
    /// True when this event started a new pipeline attempt.
    pub accepted: bool,
}

/// POST /v1/observer/events: one completed vendor request.
pub async fn post_event(
    State(state): State<AppState>,
    Json(event): Json<RequestCompleted>,
) -> Result<(StatusCode, Json<EventAck>), AppError> {
    if event.url.trim().is_empty() {
        return Err(AppError::BadRequest("url must not be empty".into()));
    }

    let accepted = state.observer.handle_event(event).is_some();
    debug!(accepted, "Observed request event");
    Ok((StatusCode::ACCEPTED, Json(EventAck { accepted })))
}

/// GET /v1/events: SSE stream of notifications.
pub async fn get_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!(
        "Notification listener connected, {} already listening",
        state.notifier.listener_count()
    );
    state.notifier.sse()
}
