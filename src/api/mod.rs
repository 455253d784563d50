pub mod admins;
pub mod audit;
pub mod auth;
pub mod data;
pub mod events;
pub mod faq;
pub mod health;
pub mod registrations;

use axum::{
    Json, Router,
    extract::OriginalUri,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use serde_json::json;

use crate::domain::DomainError;
use crate::infrastructure::AppState;

/// A failed operation: a short summary for the caller plus the cause
#[derive(Debug)]
pub struct ApiError {
    message: &'static str,
    error: DomainError,
}

impl ApiError {
    pub fn new(message: &'static str, error: DomainError) -> Self {
        Self { message, error }
    }

    /// For `map_err`: `.map_err(ApiError::failed("Failed to delete registration"))`
    pub fn failed(message: &'static str) -> impl FnOnce(DomainError) -> Self {
        move |error| Self::new(message, error)
    }

    pub fn status(&self) -> StatusCode {
        match &self.error {
            DomainError::NotFound => StatusCode::NOT_FOUND,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            DomainError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            DomainError::External(_) => StatusCode::BAD_GATEWAY,
            DomainError::Database(_) | DomainError::Storage(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self::new("Request failed", error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}: {}", self.message, self.error);
        } else {
            tracing::debug!("{}: {}", self.message, self.error);
        }

        (
            status,
            Json(json!({
                "status": "error",
                "message": self.message,
                "error": self.error.to_string(),
            })),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/db-status", get(health::db_status))
        // Registrant write path
        .route("/register", post(registrations::register))
        // Registrations
        .route(
            "/registrations",
            get(registrations::list_registrations).post(registrations::create_registration),
        )
        .route("/registrations/export", get(registrations::export_csv))
        .route("/registrations/bulk/status", post(registrations::bulk_update_status))
        .route("/registrations/bulk/delete", post(registrations::bulk_delete))
        .route(
            "/registrations/:id",
            get(registrations::get_registration)
                .put(registrations::update_registration)
                .delete(registrations::delete_registration),
        )
        .route(
            "/registrations/:id/status",
            patch(registrations::update_status),
        )
        .route("/statistics", get(registrations::statistics))
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::get_me))
        // Admin users
        .route("/admins", get(admins::list_admins).post(admins::create_admin))
        .route(
            "/admins/:id",
            get(admins::get_admin)
                .put(admins::update_admin)
                .delete(admins::deactivate_admin),
        )
        // Events
        .route("/events", get(events::list_events).post(events::create_event))
        .route("/events/upcoming", get(events::upcoming_events))
        .route(
            "/events/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/events/:id/increment", post(events::increment_registered_count))
        // Audit
        .route(
            "/audit-logs",
            get(audit::list_logs).delete(audit::cleanup_logs),
        )
        // Data management
        .route("/data/health", get(data::health))
        .route("/data/stats", get(data::stats))
        .route("/data/backup", get(data::backup))
        .route("/data/restore", post(data::restore))
        .route("/data/reset", post(data::reset))
        .route("/data/tables/:table", delete(data::clear_table))
        // FAQ helper
        .route("/faq", post(faq::ask))
        .route("/faq/:conversation_id", delete(faq::end_conversation))
        .with_state(state)
}

/// JSON 404 for every unmatched path, mounted on the outer router
pub async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "error",
            "message": "Endpoint not found",
            "path": uri.path(),
        })),
    )
}
