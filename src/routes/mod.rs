//! API route handlers
//!
//! - `health`: backend cluster health probe
//! - `search`: the metadata search endpoint and its response formatting

pub mod health;
pub mod search;

use axum::Json;
use axum::response::IntoResponse;
use serde_json::json;

use crate::error::{ApiError, ApiResult};

/// API version and base info
///
/// Root endpoint (GET /); requires no backend round trip.
pub async fn api_info() -> ApiResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "Landsat Metadata API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/landsat",
            "/healthcheck"
        ]
    })))
}

/// 404 Not Found handler for undefined routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
