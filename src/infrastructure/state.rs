//! Application state containing services and shared resources

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::DomainError;
use crate::faq::{FaqService, OpenAiClient, TextGenerator};
use crate::infrastructure::auth::{AdminAccounts, JwtSecret};
use crate::infrastructure::config::Config;
use crate::services::{AdminService, RegistrationService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Remote table store, absent when `DATABASE_URL` is unset or unreachable
    db: Option<DatabaseConnection>,
    pub registrations: Arc<RegistrationService>,
    pub admin: AdminService,
    pub faq: Arc<FaqService>,
    jwt_secret: JwtSecret,
}

impl AppState {
    pub fn new(config: Config, db: Option<DatabaseConnection>) -> Result<Self, DomainError> {
        let registrations = RegistrationService::from_config(&config, db.clone())?;
        let admin = AdminService::from_db(db.clone());

        let generator: Option<Arc<dyn TextGenerator>> = match &config.openai_api_key {
            Some(key) => Some(Arc::new(OpenAiClient::new(
                config.openai_base_url.clone(),
                key.clone(),
                config.openai_model.clone(),
                config.request_timeout,
            )?)),
            None => None,
        };

        Ok(Self {
            jwt_secret: JwtSecret(config.jwt_secret.clone()),
            config: Arc::new(config),
            db,
            registrations: Arc::new(registrations),
            admin,
            faq: Arc::new(FaqService::new(generator)),
        })
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    /// The database connection, or `NotConfigured` for handlers that need it
    pub fn require_db(&self) -> Result<&DatabaseConnection, DomainError> {
        self.db
            .as_ref()
            .ok_or_else(|| DomainError::NotConfigured("DATABASE_URL".to_string()))
    }
}

impl axum::extract::FromRef<AppState> for JwtSecret {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_secret.clone()
    }
}

impl axum::extract::FromRef<AppState> for AdminAccounts {
    fn from_ref(state: &AppState) -> Self {
        AdminAccounts(state.db.clone())
    }
}
