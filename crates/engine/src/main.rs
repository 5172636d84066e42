//! Questboard Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use questboard_engine::api::websocket::{ws_handler, WsState};
use questboard_engine::api::ConnectionManager;
use questboard_engine::app::App;
use questboard_engine::infrastructure::auth::UserStoreAuth;
use questboard_engine::infrastructure::clock::SystemClock;
use questboard_engine::infrastructure::persistence::{self, SqliteRepositories};
use questboard_engine::infrastructure::ports::ClockPort;

/// Period of the achievement unlock sweep.
const SWEEP_PERIOD: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "questboard_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Questboard Engine");

    // Load configuration
    let db_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| "questboard.db".into());
    let server_host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let server_port: u16 = std::env::var("SERVER_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "5000".into())
        .parse()
        .unwrap_or(5000);

    // Open the database and ensure schema
    let database_url = format!("sqlite:{db_path}?mode=rwc");
    tracing::info!("Opening database at {}", db_path);
    let pool = persistence::connect(&database_url).await?;
    persistence::ensure_schema(&pool).await?;

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let repos = SqliteRepositories::new(pool, clock);

    // Create connection manager (doubles as the realtime notifier)
    let connections = Arc::new(ConnectionManager::new());

    let auth = Arc::new(UserStoreAuth::new(repos.users.clone()));

    // Create application
    let app = Arc::new(App::new(repos, connections.clone(), auth));

    // Spawn the achievement unlock sweep
    let sweep_app = app.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_PERIOD);
        loop {
            ticker.tick().await;
            match sweep_app.use_cases.sweep.execute().await {
                Ok(0) => {}
                Ok(granted) => {
                    tracing::info!(granted, "Achievement sweep granted unlocks");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Achievement sweep failed");
                }
            }
        }
    });

    // Create WebSocket state
    let ws_state = Arc::new(WsState {
        connections: connections.clone(),
    });

    // Build router with separate states for HTTP and WebSocket
    let mut router = questboard_engine::api::http::routes()
        .with_state(app)
        .route("/ws", get(ws_handler).with_state(ws_state))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer_from_env() {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = format!("{server_host}:{server_port}").parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer_from_env() -> Option<CorsLayer> {
    let allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let allowed_origins = allowed_origins?;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        // Clients send bearer tokens and JSON bodies, both trigger preflights.
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
