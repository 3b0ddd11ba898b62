pub mod backend;
pub mod context;
pub mod events;
pub mod health;

use crate::backend::LeagueBackend;
use crate::db::ContextStore;
use crate::notify::Notifier;
use crate::orchestration::NetworkObserver;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub observer: NetworkObserver,
    pub backend: Arc<dyn LeagueBackend>,
    pub store: Arc<dyn ContextStore>,
    pub notifier: Notifier,
    /// Browser origins allowed by CORS. Empty means no cross-origin access.
    pub allowed_origins: Vec<String>,
}

impl AppState {
    pub fn new(
        observer: NetworkObserver,
        backend: Arc<dyn LeagueBackend>,
        store: Arc<dyn ContextStore>,
        notifier: Notifier,
    ) -> Self {
        Self {
            observer,
            backend,
            store,
            notifier,
            allowed_origins: Vec::new(),
        }
    }

    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }
}

pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/observer/events", post(events::post_event))
        .route("/v1/events", get(events::get_events))
        .route("/v1/backend/ping", get(backend::ping))
        .route(
            "/v1/context",
            get(context::get_context)
                .put(context::put_context)
                .delete(context::delete_context),
        )
        .layer(cors)
        .with_state(state)
}
