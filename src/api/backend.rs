use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub ok: bool,
}

/// GET /v1/backend/ping: is the league backend reachable?
pub async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    Json(PingResponse {
        ok: state.backend.ping().await,
    })
}
