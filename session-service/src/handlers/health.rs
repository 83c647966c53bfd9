use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crate::services::SessionStore;
use crate::startup::AppState;

/// Readiness probe: healthy only while the session store answers.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "session-service",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "service": "session-service",
                    "error": e.to_string(),
                })),
            )
        }
    }
}

/// Deployment metadata for clients that want the running version.
pub async fn service_info() -> impl IntoResponse {
    Json(json!({
        "service": "session-service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
