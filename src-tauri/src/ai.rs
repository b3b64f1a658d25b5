//! Anthropic Messages API client used for subtask generation.
//!
//! Sends the prompt as a single user message and returns the text of the
//! reply untouched; parsing it into tasks happens in the frontend.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::AnthropicConfig;
use crate::domain::{DomainError, DomainResult};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

pub struct AnthropicClient {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> DomainResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    /// Send `prompt` and return the reply text
    pub async fn complete(&self, prompt: &str) -> DomainResult<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| DomainError::InvalidInput("no Anthropic API key configured".into()))?;

        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![RequestMessage { role: "user", content: prompt }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DomainError::Internal(format!("Request timeout: {}", e))
                } else {
                    DomainError::Internal(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            log::warn!("Anthropic returned {}: {}", status, body);
            return Err(DomainError::Internal(format!("AI service returned {}", status)));
        }

        let text = extract_text(&body)?;
        log::debug!("Received {} chars of generated subtasks", text.len());
        Ok(text)
    }
}

/// First text block of a Messages API response body
fn extract_text(body: &str) -> DomainResult<String> {
    let parsed: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| DomainError::Internal(format!("Failed to parse response: {}", e)))?;
    parsed
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .ok_or_else(|| DomainError::Internal("No text in AI response".to_string()))
}
