//! Server initialization and routing
//!
//! Axum router setup, middleware stack, and graceful shutdown. The metadata
//! endpoint path comes from the configured index name, so `index = landsat`
//! serves `GET /landsat`.

use axum::Router;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{log_requests, request_id, security_headers};
use crate::routes::{api_info, health, not_found, search};
use crate::state::AppState;

/// Build the Axum router with all routes and middleware
///
/// Middleware stack (applied in reverse order):
/// 1. Request ID tracking
/// 2. Request logging
/// 3. Security headers
/// 4. Timeout handling
/// 5. Compression
/// 6. CORS
pub fn router(state: Arc<AppState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let endpoint = format!("/{}", state.config.index);

    Router::new()
        .route("/", get(api_info))
        .route("/healthcheck", get(health::healthcheck))
        .route(&endpoint, get(search::metadata_search))
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.request_timeout(),
        ))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(from_fn(security_headers))
        .layer(from_fn(request_id))
        .layer(from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server
///
/// Initializes logging, builds the shared state and router, binds the
/// configured address, and serves until SIGTERM or Ctrl+C.
pub async fn start_server(config: crate::config::ApiConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .json()
        .init();

    let addr: SocketAddr = config.socket_addr()?;
    let state = Arc::new(AppState::new(config)?);

    tracing::info!(
        "Starting Landsat metadata API on {} (index: {}, backend: {})",
        addr,
        state.config.index,
        state.config.backend_url()
    );

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
