use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use super::{ApiError, ApiResult};
use crate::domain::DomainError;
use crate::faq::FaqReply;
use crate::faq::models::FaqRequest;
use crate::infrastructure::AppState;

#[utoipa::path(
    post,
    path = "/api/faq",
    responses(
        (status = 200, description = "Answer from the text generator or the FAQ table"),
        (status = 400, description = "Empty message")
    )
)]
pub async fn ask(
    State(state): State<AppState>,
    Json(payload): Json<FaqRequest>,
) -> ApiResult<Json<FaqReply>> {
    let reply = state
        .faq
        .ask(payload.conversation_id, &payload.message)
        .await
        .map_err(ApiError::failed("Failed to answer question"))?;
    Ok(Json(reply))
}

pub async fn end_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if state.faq.end(conversation_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::new("Conversation not found", DomainError::NotFound))
    }
}
