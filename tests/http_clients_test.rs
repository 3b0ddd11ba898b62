//! Real HTTP clients against in-process fake vendor and backend servers.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use dartsleague::backend::{BackendError, HttpLeagueBackend, LeagueBackend, SubmissionOutcome};
use dartsleague::datasource::{AutodartsDataSource, DataSourceError, VendorSource};
use dartsleague::db::{save_tournament_context, MemoryContextStore};
use dartsleague::{
    Credentials, DedupTracker, NetworkObserver, Notifier, PipelineOutcome, RequestCompleted,
    SubmissionPayload, TournamentContext,
};
use reqwest::Url;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

async fn spawn_server(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

#[derive(Clone, Default)]
struct VendorState {
    headers: Arc<Mutex<Vec<(Option<String>, Option<String>)>>>,
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn stats(State(state): State<VendorState>, headers: HeaderMap) -> Json<Value> {
    state
        .headers
        .lock()
        .unwrap()
        .push((header(&headers, "cookie"), header(&headers, "authorization")));
    Json(json!({
        "id": "m1",
        "finishedAt": "2026-05-01T20:15:00Z",
        "players": [
            {"id": "a", "index": 1, "name": "Bob"},
            {"id": "b", "index": 0, "name": "Alice"}
        ],
        "scores": [{"legs": 3}, {"legs": 1}],
        "matchStats": [
            {"playerId": "a", "average": 55.2, "legsWon": 3},
            {"playerId": "b", "average": 40.1, "legsWon": 1}
        ]
    }))
}

async fn spawn_vendor() -> (SocketAddr, VendorState) {
    let state = VendorState::default();
    let router = Router::new()
        .route("/as/v0/matches/:id/stats", get(stats))
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/limited",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        )
        .route("/list", get(|| async { Json(json!([1, 2, 3])) }))
        .with_state(state.clone());
    (spawn_server(router).await, state)
}

#[derive(Clone)]
struct BackendState {
    answer: (StatusCode, Value),
    received: Arc<Mutex<Vec<Value>>>,
}

async fn game_result(
    State(state): State<BackendState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.received.lock().unwrap().push(body);
    (state.answer.0, Json(state.answer.1.clone()))
}

async fn spawn_backend(status: StatusCode, answer: Value) -> (String, BackendState) {
    let state = BackendState {
        answer: (status, answer),
        received: Arc::new(Mutex::new(Vec::new())),
    };
    let router = Router::new()
        .route("/api/autodarts/game-result", post(game_result))
        .route("/api/players", get(|| async { Json(json!([])) }))
        .with_state(state.clone());
    let addr = spawn_server(router).await;
    (format!("http://{}/api/", addr), state)
}

fn sample_payload() -> SubmissionPayload {
    SubmissionPayload {
        home_player_username: "alice".to_string(),
        away_player_username: "bob".to_string(),
        home_player_user_id: None,
        away_player_user_id: None,
        home_legs_won: 1,
        away_legs_won: 3,
        home_player_average: Some(40.1),
        away_player_average: Some(55.2),
        autodarts_game_id: "m1".to_string(),
    }
}

#[tokio::test]
async fn test_vendor_fetch_forwards_credentials() {
    let (addr, state) = spawn_vendor().await;
    let source = AutodartsDataSource::new();
    let url = format!("http://{}/as/v0/matches/0a1b/stats", addr);

    let creds = Credentials {
        cookie: Some("ad_session=abc".to_string()),
        authorization: Some("Bearer xyz".to_string()),
    };
    let payload = source.fetch_match_stats(&url, &creds).await.unwrap();
    assert_eq!(payload.id.as_deref(), Some("m1"));
    assert!(payload.is_finished());

    source
        .fetch_match_stats(&url, &Credentials::default())
        .await
        .unwrap();

    let seen = state.headers.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            (
                Some("ad_session=abc".to_string()),
                Some("Bearer xyz".to_string())
            ),
            (None, None),
        ]
    );
}

#[tokio::test]
async fn test_vendor_fetch_error_mapping() {
    let (addr, _) = spawn_vendor().await;
    let source = AutodartsDataSource::new();
    let creds = Credentials::default();

    let err = source
        .fetch_match_stats(&format!("http://{}/broken", addr), &creds)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        DataSourceError::HttpError {
            status: 500,
            message: "Internal Server Error".to_string()
        }
    );

    let err = source
        .fetch_match_stats(&format!("http://{}/limited", addr), &creds)
        .await
        .unwrap_err();
    assert_eq!(err, DataSourceError::RateLimited);

    let err = source
        .fetch_match_stats(&format!("http://{}/list", addr), &creds)
        .await
        .unwrap_err();
    assert!(matches!(err, DataSourceError::ParseError(_)));

    let err = source
        .fetch_match_stats("http://127.0.0.1:9/as/v0/matches/0a1b/stats", &creds)
        .await
        .unwrap_err();
    assert!(matches!(err, DataSourceError::NetworkError(_)));
}

#[tokio::test]
async fn test_backend_submission_matched() {
    let fixture = json!({"id": 11, "status": "COMPLETED"});
    let (base, state) = spawn_backend(StatusCode::OK, fixture.clone()).await;
    let backend = HttpLeagueBackend::new(base);

    let outcome = backend.submit_game_result(&sample_payload()).await.unwrap();
    assert_eq!(outcome, SubmissionOutcome::Matched(fixture));

    let received = state.received.lock().unwrap().clone();
    assert_eq!(received.len(), 1);
    assert_eq!(
        received[0],
        json!({
            "homePlayerUsername": "alice",
            "awayPlayerUsername": "bob",
            "homePlayerUserId": null,
            "awayPlayerUserId": null,
            "homeLegsWon": 1,
            "awayLegsWon": 3,
            "homePlayerAverage": 40.1,
            "awayPlayerAverage": 55.2,
            "autodartsGameId": "m1"
        })
    );
}

#[tokio::test]
async fn test_backend_submission_no_fixture_and_errors() {
    let (base, _) = spawn_backend(StatusCode::OK, json!({"matched": false})).await;
    let backend = HttpLeagueBackend::new(base);
    assert_eq!(
        backend.submit_game_result(&sample_payload()).await.unwrap(),
        SubmissionOutcome::NoFixture
    );

    let (base, _) = spawn_backend(StatusCode::BAD_GATEWAY, json!({"error": "down"})).await;
    let backend = HttpLeagueBackend::new(base);
    let err = backend
        .submit_game_result(&sample_payload())
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Http { status: 502, .. }));
}

#[tokio::test]
async fn test_backend_ping() {
    let (base, _) = spawn_backend(StatusCode::OK, json!({})).await;
    let backend = HttpLeagueBackend::new(base).with_ping_timeout(Duration::from_millis(500));
    assert!(backend.ping().await);

    let offline = HttpLeagueBackend::new("http://127.0.0.1:9/api".to_string())
        .with_ping_timeout(Duration::from_millis(200));
    assert!(!offline.ping().await);
}

#[tokio::test]
async fn test_full_pipeline_over_http() {
    let (vendor_addr, vendor_state) = spawn_vendor().await;
    let fixture = json!({"id": 21, "status": "COMPLETED", "homeLegs": 1, "awayLegs": 3});
    let (base, backend_state) = spawn_backend(StatusCode::OK, fixture.clone()).await;

    let store = Arc::new(MemoryContextStore::new());
    let context: TournamentContext = serde_json::from_value(json!({
        "activeTournamentId": 4,
        "tournamentPlayers": [
            {"autodartsUsername": "alice", "displayName": "Alice A"},
            {"autodartsUsername": "bob", "displayName": "Bob B"}
        ]
    }))
    .unwrap();
    save_tournament_context(store.as_ref(), &context)
        .await
        .unwrap();

    let origin = Url::parse(&format!("http://{}", vendor_addr)).unwrap();
    let observer = NetworkObserver::new(
        Arc::new(AutodartsDataSource::new()),
        Arc::new(HttpLeagueBackend::new(base)),
        store,
        Arc::new(DedupTracker::default()),
        Notifier::default(),
    )
    .with_vendor_origin(origin);

    let url = format!("http://{}/as/v0/matches/0a1b/stats", vendor_addr);
    let creds = Credentials {
        cookie: Some("ad_session=abc".to_string()),
        authorization: None,
    };
    let task = observer
        .handle_event(RequestCompleted::new(url.clone()).with_credentials(creds))
        .expect("claimed");
    for _ in 0..5 {
        assert!(observer.handle_event(RequestCompleted::new(url.clone())).is_none());
    }
    assert_eq!(task.await.unwrap(), PipelineOutcome::Submitted(fixture));

    assert_eq!(vendor_state.headers.lock().unwrap().len(), 1);
    let received = backend_state.received.lock().unwrap().clone();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["homePlayerUsername"], "alice");
    assert_eq!(received[0]["homeLegsWon"], 1);
    assert_eq!(received[0]["awayLegsWon"], 3);
    assert_eq!(received[0]["autodartsGameId"], "m1");
}
