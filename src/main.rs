use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use video_market_server::constants::UPLOAD_BODY_LIMIT_BYTES;
use video_market_server::routes::{
    create_video, current_user, delete_video, health_check, list_purchases, list_videos,
    login_user, register_user, store_purchase,
};
use video_market_server::{open_database, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "video_market_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Video Market Server...");

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "Environment: {}, Server: {}",
        config.environment,
        config.server_address()
    );

    // Open the database
    let db = open_database(&config.database_path)?;

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(
            config
                .allowed_origins
                .iter()
                .map(|s| s.parse().unwrap())
                .collect::<Vec<_>>(),
        )
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
        ])
        .allow_headers(Any);

    let storage_dir = config.storage_dir.clone();

    // Create app state
    let state = AppState::new(db, config.clone());

    // Build router. Uploaded assets are served statically from /storage;
    // entitlement is checked when listing purchases, not per asset request.
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/register", post(register_user))
        .route("/api/login", post(login_user))
        .route("/api/user", get(current_user))
        .route("/api/videos", get(list_videos).post(create_video))
        .route("/api/videos/:id", delete(delete_video))
        .route("/api/purchases", post(store_purchase).get(list_purchases))
        .nest_service("/storage", ServeDir::new(&storage_dir))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server_address().parse()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
