//! Admin account management, restricted to super admins for writes

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use super::{ApiError, ApiResult};
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::models::AdminUser;
use crate::models::admin_user::{AdminUserChanges, NewAdminUser};
use crate::services::admin_user_service::{self, SUPER_ADMIN_ROLE};

fn require_super_admin(claims: &Claims, fail: &'static str) -> ApiResult<()> {
    if claims.role != SUPER_ADMIN_ROLE {
        return Err(ApiError::new(
            fail,
            DomainError::Forbidden("super admin role required".to_string()),
        ));
    }
    Ok(())
}

pub async fn list_admins(
    State(state): State<AppState>,
    _claims: Claims,
) -> ApiResult<Json<Vec<AdminUser>>> {
    let fail = "Failed to fetch admins";
    let db = state.require_db().map_err(ApiError::failed(fail))?;
    let admins = admin_user_service::list_active_admins(db)
        .await
        .map_err(ApiError::failed(fail))?;
    Ok(Json(admins))
}

pub async fn get_admin(
    State(state): State<AppState>,
    _claims: Claims,
    Path(id): Path<i64>,
) -> ApiResult<Json<AdminUser>> {
    let fail = "Failed to fetch admin";
    let db = state.require_db().map_err(ApiError::failed(fail))?;
    let admin = admin_user_service::get_admin(db, id)
        .await
        .map_err(ApiError::failed(fail))?;
    Ok(Json(admin))
}

pub async fn create_admin(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<NewAdminUser>,
) -> ApiResult<impl IntoResponse> {
    let fail = "Failed to create admin";
    require_super_admin(&claims, fail)?;
    let db = state.require_db().map_err(ApiError::failed(fail))?;
    let admin = admin_user_service::create_admin(db, payload)
        .await
        .map_err(ApiError::failed(fail))?;
    Ok((StatusCode::CREATED, Json(admin)))
}

pub async fn update_admin(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i64>,
    Json(changes): Json<AdminUserChanges>,
) -> ApiResult<Json<AdminUser>> {
    let fail = "Failed to update admin";
    // Admins may edit their own profile but not their role or activation
    if claims.admin_id != id || changes.role.is_some() || changes.is_active.is_some() {
        require_super_admin(&claims, fail)?;
    }
    let db = state.require_db().map_err(ApiError::failed(fail))?;
    let admin = admin_user_service::update_admin(db, id, changes)
        .await
        .map_err(ApiError::failed(fail))?;
    Ok(Json(admin))
}

pub async fn deactivate_admin(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let fail = "Failed to deactivate admin";
    require_super_admin(&claims, fail)?;
    if claims.admin_id == id {
        return Err(ApiError::new(
            fail,
            DomainError::Validation("cannot deactivate your own account".to_string()),
        ));
    }
    let db = state.require_db().map_err(ApiError::failed(fail))?;
    admin_user_service::deactivate_admin(db, id)
        .await
        .map_err(ApiError::failed(fail))?;
    Ok(Json(json!({ "message": "Admin deactivated" })))
}
