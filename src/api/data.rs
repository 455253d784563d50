//! Database health, backup and development resets

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;

use super::{ApiError, ApiResult};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::services::database_service::{self, Backup, DatabaseStats, HealthStatus, TableName};

#[utoipa::path(
    get,
    path = "/api/data/health",
    responses(
        (status = 200, description = "Database reachable, with table counts"),
        (status = 503, description = "Database unreachable or not configured")
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let Some(db) = state.db() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "error",
                "message": "Database not configured",
                "timestamp": crate::utils::time::now_iso(),
            })),
        )
            .into_response();
    };

    let status: HealthStatus = database_service::health_status(db).await;
    let code = if status.status == "healthy" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status)).into_response()
}

pub async fn stats(
    State(state): State<AppState>,
    _claims: Claims,
) -> ApiResult<Json<DatabaseStats>> {
    let fail = "Failed to get database stats";
    let db = state.require_db().map_err(ApiError::failed(fail))?;
    let stats = database_service::database_stats(db)
        .await
        .map_err(ApiError::failed(fail))?;
    Ok(Json(stats))
}

pub async fn backup(
    State(state): State<AppState>,
    _claims: Claims,
) -> ApiResult<impl IntoResponse> {
    let fail = "Failed to create database backup";
    let db = state.require_db().map_err(ApiError::failed(fail))?;
    let backup = database_service::create_backup(db)
        .await
        .map_err(ApiError::failed(fail))?;

    let filename = format!("db-backup-{}.json", chrono::Utc::now().timestamp_millis());
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    if let Ok(value) = format!("attachment; filename=\"{}\"", filename).parse() {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok((headers, Json(backup)))
}

pub async fn restore(
    State(state): State<AppState>,
    _claims: Claims,
    Json(backup): Json<Backup>,
) -> ApiResult<impl IntoResponse> {
    let fail = "Failed to restore backup";
    let db = state.require_db().map_err(ApiError::failed(fail))?;
    database_service::restore_backup(db, state.config.environment, backup)
        .await
        .map_err(ApiError::failed(fail))?;
    Ok(Json(json!({ "message": "Database restored successfully" })))
}

pub async fn reset(State(state): State<AppState>, _claims: Claims) -> ApiResult<impl IntoResponse> {
    let fail = "Failed to reset database";
    let db = state.require_db().map_err(ApiError::failed(fail))?;
    database_service::reset_database(db, state.config.environment)
        .await
        .map_err(ApiError::failed(fail))?;
    Ok(Json(json!({ "message": "Database reset complete" })))
}

pub async fn clear_table(
    State(state): State<AppState>,
    _claims: Claims,
    Path(table): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let fail = "Failed to clear table";
    let table: TableName = table.parse().map_err(ApiError::failed(fail))?;
    let db = state.require_db().map_err(ApiError::failed(fail))?;
    let deleted = database_service::clear_table(db, state.config.environment, table)
        .await
        .map_err(ApiError::failed(fail))?;
    Ok(Json(json!({ "table": table, "deleted": deleted })))
}
