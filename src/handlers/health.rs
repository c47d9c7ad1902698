use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::handlers::AppState;

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Credential store reachable"),
        (status = 503, description = "Credential store unavailable")
    )
)]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status, store_status) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(e) => {
            tracing::error!("Readiness check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
    };

    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "ready" } else { "not_ready" },
            "checks": {
                "store": store_status
            },
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}
