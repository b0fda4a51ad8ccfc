//! # cholera-server
//!
//! REST API for cholera case prediction and multi-day forecasting.

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use forecast_facade::{ResourceCache, ServiceConfig};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod error;
mod routes;
mod state;

use error::ApiError;
use state::AppState;

fn app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    Router::new()
        // Health endpoints
        .route("/health", get(routes::health))
        .route("/health/live", get(routes::liveness))
        // API endpoints
        .route("/predict", post(routes::predict))
        .route("/forecast", post(routes::forecast))
        // Dashboard endpoint names
        .route("/api/lstm/predict", post(routes::predict))
        .route("/api/lstm/forecast", post(routes::forecast))
        // Middleware layers
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Handler panicked: {}", detail);
    ApiError::Internal(detail).into_response()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "server=info,forecast_core=info,data_core=info,tower_http=info".into()
            }),
        )
        .init();

    let config = ServiceConfig::from_env();
    tracing::info!(
        "Model: {}, dataset: {}",
        config.model_path.display(),
        config.dataset_path.display()
    );

    let cache = Arc::new(ResourceCache::from_paths(
        config.dataset_path.clone(),
        config.model_path.clone(),
    ));
    let warm = Arc::clone(&cache);
    tokio::task::spawn_blocking(move || warm.warm_up())
        .await
        .context("Resource warm-up task failed")?;

    let state = AppState::new(cache, config.forecast.clone());

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid HOST:PORT configuration: {}", config.bind_address()))?;

    tracing::info!("cholera-server v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
