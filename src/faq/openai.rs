//! Chat-completions client for the FAQ helper

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::models::{ChatMessage, ChatRole};
use crate::domain::DomainError;

pub const SYSTEM_PROMPT: &str = "You are a registration help assistant for a college hackathon. \
Only answer about eligibility, team size, registration steps, or contact details. \
Keep answers short and clear.";

pub const TEMPERATURE: f64 = 0.2;

/// Something that turns a conversation into the next assistant message
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, history: &[ChatMessage]) -> Result<String, DomainError>;
}

pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<CompletionMessage>,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: ChatRole,
    content: &'a str,
}

impl OpenAiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, history: &[ChatMessage]) -> Result<String, DomainError> {
        let mut messages = vec![WireMessage {
            role: ChatRole::System,
            content: SYSTEM_PROMPT,
        }];
        messages.extend(history.iter().map(|m| WireMessage {
            role: m.role,
            content: &m.content,
        }));

        let body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": TEMPERATURE,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DomainError::External(format!(
                "text generation returned {}",
                response.status()
            )));
        }

        let parsed: CompletionResponse = response.json().await?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default())
    }
}
