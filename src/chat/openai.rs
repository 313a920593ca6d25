//! OpenAI-compatible chat completion client

use super::{ChatCompleter, ChatError, CompletionRequest};
use crate::config::{ApiKey, ChatConfig};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Longest error body kept in [`ChatError::Status`]
const MAX_ERROR_BODY: usize = 500;

pub struct OpenAiCompleter {
    client: reqwest::Client,
    api_base: String,
    api_key: ApiKey,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompleter {
    pub fn new(
        api_base: impl Into<String>,
        api_key: ApiKey,
        timeout: Duration,
    ) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &ChatConfig) -> Result<Self, ChatError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or(ChatError::MissingApiKey)?;
        Self::new(&config.api_base, api_key, Duration::from_secs(config.timeout_secs))
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

#[async_trait]
impl ChatCompleter for OpenAiCompleter {
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>, ChatError> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.api_key.expose())
            .json(request)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Parse(e.to_string()))?;

        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}
