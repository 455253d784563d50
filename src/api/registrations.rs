//! Registration handlers
//!
//! `/register` is the registrant-facing tiered write. The `/registrations`
//! routes pass straight through to the remote table; the mutating ones
//! require an admin token.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use super::{ApiError, ApiResult};
use crate::domain::{
    NewRegistration, Registration, RegistrationChanges, RegistrationStats,
    RegistrationStatus,
};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::services::csv_export::registrations_to_csv;

#[derive(Debug, Default, Deserialize)]
pub struct RegistrationsQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub dept: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: RegistrationStatus,
}

#[derive(Debug, Deserialize)]
pub struct BulkStatusRequest {
    pub ids: Vec<i64>,
    pub status: RegistrationStatus,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<i64>,
}

#[utoipa::path(
    post,
    path = "/api/register",
    responses(
        (status = 201, description = "Registration stored by the first available tier"),
        (status = 400, description = "Payload failed validation"),
        (status = 500, description = "Every tier failed")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<NewRegistration>,
) -> ApiResult<impl IntoResponse> {
    let record = state
        .registrations
        .register(payload)
        .await
        .map_err(ApiError::failed("Registration failed, please try again"))?;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_registrations(
    State(state): State<AppState>,
    Query(params): Query<RegistrationsQuery>,
) -> ApiResult<Json<Vec<Registration>>> {
    let records = state
        .registrations
        .list(&params.search, &params.dept)
        .await
        .map_err(ApiError::failed("Failed to fetch registrations"))?;
    Ok(Json(records))
}

pub async fn get_registration(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Registration>> {
    let record = state
        .registrations
        .get(id)
        .await
        .map_err(ApiError::failed("Failed to fetch registration"))?;
    Ok(Json(record))
}

/// Direct insert into the remote table, the endpoint an upstream proxy tier
/// talks to
pub async fn create_registration(
    State(state): State<AppState>,
    Json(payload): Json<NewRegistration>,
) -> ApiResult<impl IntoResponse> {
    let record = state
        .admin
        .create(payload, None)
        .await
        .map_err(ApiError::failed("Failed to create registration"))?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_registration(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i64>,
    Json(changes): Json<RegistrationChanges>,
) -> ApiResult<Json<Registration>> {
    let record = state
        .admin
        .update(id, changes, Some(claims.admin_id))
        .await
        .map_err(ApiError::failed("Failed to update registration"))?;
    Ok(Json(record))
}

pub async fn update_status(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i64>,
    Json(body): Json<StatusRequest>,
) -> ApiResult<Json<Registration>> {
    let record = state
        .admin
        .update_status(id, body.status, Some(claims.admin_id))
        .await
        .map_err(ApiError::failed("Failed to update registration status"))?;
    Ok(Json(record))
}

pub async fn delete_registration(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    state
        .admin
        .delete(id, Some(claims.admin_id))
        .await
        .map_err(ApiError::failed("Failed to delete registration"))?;
    Ok(Json(json!({ "message": "Registration deleted successfully" })))
}

pub async fn bulk_update_status(
    State(state): State<AppState>,
    _claims: Claims,
    Json(body): Json<BulkStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    let updated = state
        .admin
        .bulk_update_status(&body.ids, body.status)
        .await
        .map_err(ApiError::failed("Failed to bulk update registrations"))?;
    Ok(Json(json!({ "updated": updated })))
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    _claims: Claims,
    Json(body): Json<BulkDeleteRequest>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state
        .admin
        .bulk_delete(&body.ids)
        .await
        .map_err(ApiError::failed("Failed to bulk delete registrations"))?;
    Ok(Json(json!({ "deleted": deleted })))
}

pub async fn export_csv(
    State(state): State<AppState>,
    _claims: Claims,
    Query(params): Query<RegistrationsQuery>,
) -> ApiResult<impl IntoResponse> {
    let fail = "Failed to export registrations";
    let records = state
        .admin
        .list(&params.search, &params.dept)
        .await
        .map_err(ApiError::failed(fail))?;
    let csv = registrations_to_csv(&records).map_err(ApiError::failed(fail))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"hackathon_registrations.csv\"",
            ),
        ],
        csv,
    ))
}

#[utoipa::path(
    get,
    path = "/api/statistics",
    responses(
        (status = 200, description = "Counts by status and department"),
        (status = 503, description = "No database configured")
    )
)]
pub async fn statistics(State(state): State<AppState>) -> ApiResult<Json<RegistrationStats>> {
    let stats = state
        .admin
        .stats()
        .await
        .map_err(ApiError::failed("Failed to fetch statistics"))?;
    Ok(Json(stats))
}
