use anyhow::Context;
use dartsleague::engine::spawn_sweeper;
use dartsleague::{
    api, config::Config, init_db, AutodartsDataSource, ContextStore, DedupTracker,
    HttpLeagueBackend, LeagueBackend, NetworkObserver, Notifier, SqliteContextStore,
    VendorSource,
};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let pool = init_db(&config.database_path)
        .await
        .context("Failed to initialize database")?;

    let store: Arc<dyn ContextStore> = Arc::new(SqliteContextStore::new(pool));
    let vendor: Arc<dyn VendorSource> = Arc::new(AutodartsDataSource::new());
    let backend: Arc<dyn LeagueBackend> = Arc::new(
        HttpLeagueBackend::new(config.backend_url.clone()).with_ping_timeout(config.ping_timeout()),
    );

    // Lives for the whole process; only the sweeper and the observer touch it.
    let tracker = Arc::new(DedupTracker::new(config.cooldown()));
    let _sweeper = spawn_sweeper(tracker.clone(), config.sweep_interval());

    let notifier = Notifier::default();
    let observer = NetworkObserver::new(
        vendor,
        backend.clone(),
        store.clone(),
        tracker,
        notifier.clone(),
    )
    .with_vendor_origin(config.vendor_origin.clone());

    let state = api::AppState::new(observer, backend, store, notifier)
        .with_allowed_origins(config.cors_origins.clone());
    let app = api::create_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(
        vendor_origin = %config.vendor_origin,
        backend = %config.backend_url,
        cors_origins = ?config.cors_origins,
        "Server listening on {}",
        addr
    );

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
