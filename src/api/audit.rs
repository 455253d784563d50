use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use super::{ApiError, ApiResult};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::models::{AuditAction, AuditLog};
use crate::services::audit_service::{self, AuditFilter};

#[derive(Debug, Default, Deserialize)]
pub struct AuditQuery {
    pub table: Option<String>,
    pub record_id: Option<i64>,
    pub action: Option<AuditAction>,
    pub admin_id: Option<i64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CleanupQuery {
    pub older_than_days: Option<i64>,
}

pub async fn list_logs(
    State(state): State<AppState>,
    _claims: Claims,
    Query(params): Query<AuditQuery>,
) -> ApiResult<Json<Vec<AuditLog>>> {
    let fail = "Failed to fetch audit logs";
    let db = state.require_db().map_err(ApiError::failed(fail))?;
    let filter = AuditFilter {
        table_name: params.table,
        record_id: params.record_id,
        action: params.action,
        admin_id: params.admin_id,
        limit: params.limit,
    };
    let logs = audit_service::list_logs(db, filter)
        .await
        .map_err(ApiError::failed(fail))?;
    Ok(Json(logs))
}

pub async fn cleanup_logs(
    State(state): State<AppState>,
    _claims: Claims,
    Query(params): Query<CleanupQuery>,
) -> ApiResult<impl IntoResponse> {
    let fail = "Failed to clean up audit logs";
    let db = state.require_db().map_err(ApiError::failed(fail))?;
    let days = params
        .older_than_days
        .unwrap_or(state.config.audit_retention_days);
    let deleted = audit_service::cleanup_older_than(db, days)
        .await
        .map_err(ApiError::failed(fail))?;
    Ok(Json(json!({ "deleted": deleted, "older_than_days": days })))
}
