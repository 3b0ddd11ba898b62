use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use super::AppState;
use crate::db::{clear_tournament_context, load_tournament_context, save_tournament_context};
use crate::domain::TournamentContext;
use crate::error::AppError;

/// GET /v1/context
pub async fn get_context(
    State(state): State<AppState>,
) -> Result<Json<TournamentContext>, AppError> {
    let context = load_tournament_context(state.store.as_ref()).await?;
    Ok(Json(context))
}

/// PUT /v1/context: replace the active tournament and roster snapshot.
pub async fn put_context(
    State(state): State<AppState>,
    Json(context): Json<TournamentContext>,
) -> Result<StatusCode, AppError> {
    save_tournament_context(state.store.as_ref(), &context).await?;
    info!(
        active = context.is_active(),
        players = context.players.len(),
        "Tournament context updated"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /v1/context
pub async fn delete_context(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    clear_tournament_context(state.store.as_ref()).await?;
    info!("Tournament context cleared");
    Ok(StatusCode::NO_CONTENT)
}
