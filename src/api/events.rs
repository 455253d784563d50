use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use super::{ApiError, ApiResult};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::models::event::{self, EventChanges, EventStatus, NewEvent};
use crate::services::event_service;

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub status: Option<EventStatus>,
}

#[derive(Debug, Deserialize)]
pub struct IncrementRequest {
    #[serde(default = "one")]
    pub by: i32,
}

fn one() -> i32 {
    1
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<EventsQuery>,
) -> ApiResult<Json<Vec<event::Model>>> {
    let fail = "Failed to fetch events";
    let db = state.require_db().map_err(ApiError::failed(fail))?;
    let events = event_service::list_events(db, params.status)
        .await
        .map_err(ApiError::failed(fail))?;
    Ok(Json(events))
}

pub async fn upcoming_events(State(state): State<AppState>) -> ApiResult<Json<Vec<event::Model>>> {
    let fail = "Failed to fetch upcoming events";
    let db = state.require_db().map_err(ApiError::failed(fail))?;
    let events = event_service::upcoming_events(db)
        .await
        .map_err(ApiError::failed(fail))?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<event::Model>> {
    let fail = "Failed to fetch event";
    let db = state.require_db().map_err(ApiError::failed(fail))?;
    let event = event_service::get_event(db, id)
        .await
        .map_err(ApiError::failed(fail))?;
    Ok(Json(event))
}

pub async fn create_event(
    State(state): State<AppState>,
    claims: Claims,
    Json(mut payload): Json<NewEvent>,
) -> ApiResult<impl IntoResponse> {
    let fail = "Failed to create event";
    let db = state.require_db().map_err(ApiError::failed(fail))?;
    payload.created_by = Some(claims.admin_id);
    let event = event_service::create_event(db, payload)
        .await
        .map_err(ApiError::failed(fail))?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn update_event(
    State(state): State<AppState>,
    _claims: Claims,
    Path(id): Path<i64>,
    Json(changes): Json<EventChanges>,
) -> ApiResult<Json<event::Model>> {
    let fail = "Failed to update event";
    let db = state.require_db().map_err(ApiError::failed(fail))?;
    let event = event_service::update_event(db, id, changes)
        .await
        .map_err(ApiError::failed(fail))?;
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    _claims: Claims,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let fail = "Failed to delete event";
    let db = state.require_db().map_err(ApiError::failed(fail))?;
    event_service::delete_event(db, id)
        .await
        .map_err(ApiError::failed(fail))?;
    Ok(Json(json!({ "message": "Event deleted successfully" })))
}

pub async fn increment_registered_count(
    State(state): State<AppState>,
    _claims: Claims,
    Path(id): Path<i64>,
    body: Option<Json<IncrementRequest>>,
) -> ApiResult<Json<event::Model>> {
    let fail = "Failed to update event registration count";
    let db = state.require_db().map_err(ApiError::failed(fail))?;
    let by = body.map(|Json(b)| b.by).unwrap_or(1);
    let event = event_service::increment_registered_count(db, id, by)
        .await
        .map_err(ApiError::failed(fail))?;
    Ok(Json(event))
}
