use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

mod db;
mod domain;
mod rest;

use db::ExpenseStore;
use domain::ExpenseService;
use rest::AppState;

const DEFAULT_DATABASE_URL: &str = "sqlite:expenses.db";
const DEFAULT_PORT: u16 = 3000;

// Origin of the trunk dev server during frontend development
const DEV_FRONTEND_ORIGIN: &str = "http://localhost:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let port = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    info!("Setting up expense store at {}", database_url);
    let store = ExpenseStore::new(&database_url).await?;

    let state = AppState::new(ExpenseService::new(store.clone()));

    let cors = CorsLayer::new()
        .allow_origin(DEV_FRONTEND_ORIGIN.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api", rest::api_routes())
        .fallback_service(ServeDir::new(PathBuf::from("frontend/dist")))
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down, closing expense store");
    store.close().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
