//! OpenRouter chat completions client.
//!
//! Sends a single user message and returns the first choice's content.
//! Any OpenAI-compatible endpoint works by pointing `OPENROUTER_BASE_URL`
//! at it.

use super::NameGenerator;
use crate::models::config::OpenRouterConfig;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenRouter API client.
pub struct OpenRouterClient {
    config: OpenRouterConfig,
    api_key: String,
    client: reqwest::Client,
}

/// Chat message.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Chat completion request payload.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    /// Sampling temperature (0 = deterministic, 1 = creative)
    temperature: f32,
}

/// Chat completion response.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// One completion choice.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

impl ChatResponse {
    /// Trimmed content of the first choice, if any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .map(|c| c.message.content.trim())
            .filter(|c| !c.is_empty())
    }
}

impl OpenRouterClient {
    /// Create a new client. Fails when no API key or model is configured.
    pub fn new(config: OpenRouterConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(crate::Error::GeneratorApiKeyMissing)?;
        if config.model.trim().is_empty() {
            return Err(crate::Error::GeneratorModelMissing);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    /// Model used for requests.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn request_body<'a>(&'a self, prompt: &str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.config.temperature,
        }
    }

    /// Send a chat completion request.
    pub async fn complete(&self, prompt: &str) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp)
    }
}

impl NameGenerator for OpenRouterClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let response = self
            .complete(prompt)
            .await
            .map_err(|e| crate::Error::GenerationFailed(e.to_string()))?;

        response
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| crate::Error::GenerationFailed("empty response".to_string()))
    }
}
