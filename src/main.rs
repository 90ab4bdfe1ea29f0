// 允许未使用的代码（预留功能）
#![allow(dead_code)]
#![allow(unused_imports)]

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing_subscriber;

mod api;
mod config;
mod database;
mod dataset;
mod engine;
mod external;
mod models;
mod services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = Arc::new(config::AppConfig::from_env());

    // Load the film dataset; serving without data is pointless, so this is fatal
    let initial = dataset::loader::load_from_path(&config.films_data_path).await?;
    let films_loaded = initial.len();
    let dataset = dataset::DatasetHandle::new(initial);

    // Initialize the ingest pipeline
    let ingest = Arc::new(services::IngestService::new(config.clone(), dataset.clone())?);

    // Build our application with routes
    let mut app = Router::new()
        .route("/", get(|| async { "Film Explorer Backend API v1.0" }))
        // Health and stats
        .route("/api/health", get(api::health::health_check))
        .route("/api/stats", get(api::health::get_stats))
        // Film queries
        .route("/api/films", get(api::films::get_films))
        .route("/api/films/filters", get(api::films::get_filter_options))
        .route("/api/films/chart", get(api::chart::get_chart))
        // Data ingest
        .route("/api/ingest/run", post(api::ingest::run_ingest))
        .route("/api/ingest/status/:session_id", get(api::ingest::get_ingest_status))
        .layer(CorsLayer::permissive())
        .with_state(api::AppState {
            config: config.clone(),
            dataset,
            ingest,
        });

    // Serve the frontend bundle when configured
    if let Some(static_dir) = &config.static_dir {
        app = app.nest_service("/app", ServeDir::new(static_dir));
        tracing::info!("🖼️ Serving static files from {}", static_dir);
    }

    let addr: SocketAddr = config.bind_addr().parse()?;
    tracing::info!("🚀 Server listening on {}", addr);
    tracing::info!("📚 Dataset ready with {} films from {}", films_loaded, config.films_data_path);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
