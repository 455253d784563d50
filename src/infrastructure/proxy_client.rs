//! HTTP client for an upstream registration proxy
//!
//! The upstream exposes the same `/api/registrations` surface as this
//! crate's own server.

use std::time::Duration;

use crate::domain::{DomainError, NewRegistration, Registration};

#[derive(Clone)]
pub struct ProxyClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .map_err(|e| DomainError::Validation(format!("API_BASE_URL: {}", e)))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn create_registration(
        &self,
        payload: &NewRegistration,
    ) -> Result<Registration, DomainError> {
        let url = format!("{}/api/registrations", self.base_url);

        let response = self.client.post(&url).json(payload).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                "Failed to create registration".to_string()
            } else {
                body
            };
            return Err(DomainError::External(format!("{}: {}", status, message)));
        }

        Ok(response.json::<Registration>().await?)
    }
}
