use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "catalog-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Ready once the configured persistence backend answers.
pub async fn readiness_check(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let backend = match &state.db {
        Some(db) => {
            db.health_check().await.map_err(|e| {
                tracing::error!(error = %e, "Readiness check failed");
                AppError::ServiceUnavailable
            })?;
            "mongodb"
        }
        None => "memory",
    };

    Ok(Json(json!({
        "status": "ready",
        "checks": { "persistence": backend }
    })))
}

pub async fn metrics() -> impl IntoResponse {
    service_core::observability::get_metrics()
}
