//! Generation service client.
//!
//! [`Recommender`] is the seam between the orchestrator and the language
//! model. [`OpenAiRecommender`] talks to any OpenAI-compatible
//! `chat/completions` endpoint, sending the whole rendered prompt as one
//! user message.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use repcoach_core::config::GenerationConfig;

use crate::error::{ChatError, GenerationFailure};
use crate::prompt::PromptRequest;

/// Produces response text for a rendered prompt.
#[async_trait]
pub trait Recommender: Send + Sync {
    async fn generate(&self, request: &PromptRequest) -> Result<String, ChatError>;
}

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<CompletionMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct CompletionMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

// ============================================================================
// OpenAiRecommender
// ============================================================================

/// OpenAI-compatible chat completions client.
#[derive(Clone)]
pub struct OpenAiRecommender {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
    api_key: Option<String>,
}

impl std::fmt::Debug for OpenAiRecommender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiRecommender")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

impl OpenAiRecommender {
    pub fn new(config: &GenerationConfig, api_key: Option<String>) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ChatError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    /// Build from config, reading the key from `config.api_key_env`.
    pub fn from_env(config: &GenerationConfig) -> Result<Self, ChatError> {
        Self::new(config, std::env::var(&config.api_key_env).ok())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn parse_error(status: StatusCode, body: &str) -> ChatError {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.chars().take(200).collect());
        let kind = match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationFailure::Authentication,
            other => GenerationFailure::Status(other.as_u16()),
        };
        ChatError::generation(kind, message)
    }
}

#[async_trait]
impl Recommender for OpenAiRecommender {
    #[instrument(skip_all, fields(model = %self.model, prompt_chars = request.text.len()))]
    async fn generate(&self, request: &PromptRequest) -> Result<String, ChatError> {
        let body = CompletionRequest {
            model: &self.model,
            messages: vec![CompletionMessage {
                role: "user",
                content: &request.text,
            }],
            temperature: self.temperature,
        };

        let mut http_request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body);
        if let Some(key) = &self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request.send().await.map_err(|e| {
            error!("Failed to send generation request: {}", e);
            ChatError::generation(GenerationFailure::Transport, e.to_string())
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            ChatError::generation(GenerationFailure::Transport, format!("failed to read response: {}", e))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error(status, &text));
        }

        let parsed: CompletionResponse = serde_json::from_str(&text).map_err(|e| {
            ChatError::generation(GenerationFailure::Malformed, e.to_string())
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(ChatError::generation(
                GenerationFailure::EmptyResponse,
                "model returned no text",
            ));
        }

        debug!(response_chars = content.len(), "Generation complete");
        Ok(content)
    }
}
