use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use std::sync::Arc;

use crate::state::AppState;

/// Backend health probe
///
/// Asks the cluster to reach at least yellow for the configured index.
/// Plain-text `OK`/`NAK` body so load balancers can string-match it.
pub async fn healthcheck(State(state): State<Arc<AppState>>) -> Response {
    match state.backend.cluster_health().await {
        Ok(health) => {
            let health_json = serde_json::to_string_pretty(&health).unwrap_or_default();
            let status = health
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or("unknown");

            if status == "red" {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("NAK.\nStatus: {health_json}\n"),
                )
                    .into_response()
            } else {
                format!("OK\n\n{health_json}\n").into_response()
            }
        }
        Err(err) => {
            tracing::error!(error = %err, "healthcheck failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("NAK.\n{err}\n")).into_response()
        }
    }
}
