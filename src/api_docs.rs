use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::health::db_status,
        api::registrations::register,
        api::registrations::statistics,
        api::auth::login,
        api::data::health,
        api::faq::ask,
    ),
    tags(
        (name = "hackathon-portal", description = "Hackathon registration API")
    )
)]
pub struct ApiDoc;
