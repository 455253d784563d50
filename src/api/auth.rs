use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResult};
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::{Claims, create_jwt};
use crate::models::AdminUser;
use crate::services::admin_user_service;

#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    token: String,
    admin: AdminUser,
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    responses(
        (status = 200, description = "Token issued"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let fail = "Login failed";
    tracing::info!("Login attempt for admin: {}", payload.username);

    let db = state.require_db().map_err(ApiError::failed(fail))?;
    let admin = admin_user_service::authenticate(db, &payload.username, &payload.password)
        .await
        .map_err(ApiError::failed(fail))?;

    let token = create_jwt(&state.config.jwt_secret, admin.id, &admin.username, &admin.role)
        .map_err(|e| ApiError::new(fail, DomainError::Internal(e)))?;

    Ok(Json(LoginResponse { token, admin }))
}

pub async fn get_me(State(state): State<AppState>, claims: Claims) -> ApiResult<Json<AdminUser>> {
    let fail = "Failed to load current admin";
    let db = state.require_db().map_err(ApiError::failed(fail))?;
    let admin = admin_user_service::get_admin(db, claims.admin_id)
        .await
        .map_err(ApiError::failed(fail))?;

    if !admin.is_active {
        return Err(ApiError::new(fail, DomainError::Unauthorized));
    }
    Ok(Json(admin))
}
