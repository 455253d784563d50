use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::{Value, json};

use crate::infrastructure::AppState;
use crate::utils::time::now_iso;

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is running")
    )
)]
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Backend server is running",
        "timestamp": now_iso(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[utoipa::path(
    get,
    path = "/api/db-status",
    responses(
        (status = 200, description = "Database reachable, with registration count"),
        (status = 500, description = "Database query failed"),
        (status = 503, description = "No database configured")
    )
)]
pub async fn db_status(State(state): State<AppState>) -> impl IntoResponse {
    let Some(repo) = state.registrations.repository() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "error",
                "message": "Database not configured",
                "error": "DATABASE_URL is not set",
            })),
        )
            .into_response();
    };

    match repo.count().await {
        Ok(count) => Json(json!({
            "status": "connected",
            "message": "Database connection successful",
            "tables": { "registrations": count },
        }))
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "error",
                "message": "Database connection failed",
                "error": e.to_string(),
            })),
        )
            .into_response(),
    }
}
