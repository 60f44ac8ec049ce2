//! Chat-completion summarizer (OpenAI-compatible).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::SummarizerConfig;
use crate::error::{Result, SummarizerError};

use super::Summarizer;

/// Summarizer backed by a `/chat/completions` endpoint.
pub struct ChatCompletionSummarizer {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    max_tokens: u32,
}

/// Chat completion request format.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completion response format.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI error response format.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl ChatCompletionSummarizer {
    /// Create a summarizer from configuration.
    ///
    /// Fails when no API key is configured or present in the environment.
    pub fn from_config(config: &SummarizerConfig) -> Result<Self> {
        let api_key = config
            .resolved_api_key()
            .ok_or(SummarizerError::MissingCredentials)?;

        Self::new(
            &config.base_url,
            &config.model,
            &api_key,
            config.max_tokens,
            config.timeout_secs,
        )
    }

    /// Create a summarizer with explicit parameters.
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: &str,
        max_tokens: u32,
        timeout_secs: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SummarizerError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Make one completion request.
    async fn request_completion(
        &self,
        system: &str,
        prompt: &str,
    ) -> std::result::Result<String, SummarizerError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SummarizerError::Request("Request timed out".to_string())
                } else if e.is_connect() {
                    SummarizerError::Request(format!("Connection failed: {}", e))
                } else {
                    SummarizerError::Request(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| SummarizerError::Request(format!("Failed to read response: {}", e)))?;
            parse_completion(&body)
        } else if status.as_u16() == 429 {
            Err(SummarizerError::RateLimited)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            let message = serde_json::from_str::<ErrorResponse>(&error_text)
                .map(|r| r.error.message)
                .unwrap_or(error_text);

            Err(SummarizerError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Extract the first choice's text from a completion body.
fn parse_completion(body: &str) -> std::result::Result<String, SummarizerError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| SummarizerError::MalformedResponse(e.to_string()))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default();

    if content.trim().is_empty() {
        Err(SummarizerError::EmptyCompletion)
    } else {
        Ok(content)
    }
}

#[async_trait]
impl Summarizer for ChatCompletionSummarizer {
    async fn summarize(&self, system: &str, prompt: &str) -> Option<String> {
        match self.request_completion(system, prompt).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(model = %self.model, "Summarizer unavailable, using fallback: {}", e);
                None
            }
        }
    }
}
