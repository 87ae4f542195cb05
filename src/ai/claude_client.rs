// Claude API backend for playlist generation
//
// Implements `GenerationBackend` over Anthropic's Messages API:
// - one non-streaming request per call
// - output schema embedded in the system prompt
// - transport and HTTP status failures reported as `Unavailable`

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::generation::{GenerationBackend, GenerationError, GenerationRequest};
use super::prompt::SYSTEM_PROMPT;
use crate::config::AiConfig;

const CLAUDE_VERSION: &str = "2023-06-01";

/// Message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String, // "user" or "assistant"
    pub content: String,
}

/// Request to Claude API
#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

/// Response from Claude API
#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

pub struct ClaudeBackend {
    api_key: Option<String>,
    api_url: String,
    model: String,
    max_tokens: u32,
    client: Client,
}

impl ClaudeBackend {
    /// Create a backend from config. A missing key is allowed here; every
    /// call then fails as unavailable.
    pub fn new(config: &AiConfig, api_key: Option<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            api_key,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            client,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// System prompt with the required output schema appended
    fn system_prompt(request: &GenerationRequest) -> String {
        format!(
            "{}\n\nThe JSON object must validate against this JSON Schema:\n{}",
            SYSTEM_PROMPT, request.output_schema
        )
    }
}

#[async_trait]
impl GenerationBackend for ClaudeBackend {
    async fn complete(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            GenerationError::Unavailable("No API key configured".to_string())
        })?;

        let body = ClaudeRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: request.instruction.clone(),
            }],
            system: Some(Self::system_prompt(request)),
        };

        let response = self
            .client
            .post(&self.api_url)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-api-key", api_key)
            .header("anthropic-version", CLAUDE_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Unavailable(format!("API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GenerationError::Unavailable(format!(
                "API error {}: {}",
                status, error_text
            )));
        }

        // Timeouts and dropped connections can still happen while the body
        // streams in
        let bytes = response.bytes().await.map_err(|e| {
            GenerationError::Unavailable(format!("Failed to read response body: {}", e))
        })?;

        // A complete 200 with an unexpected envelope means the service
        // answered in a shape we can't use
        let claude_response: ClaudeResponse = serde_json::from_slice(&bytes)
            .map_err(|e| GenerationError::Schema(format!("Failed to parse response: {}", e)))?;

        if claude_response.stop_reason.as_deref() == Some("max_tokens") {
            log::warn!("Claude reply hit max_tokens; playlist JSON may be truncated");
        }

        Ok(response_text(&claude_response))
    }
}

/// Concatenate the text blocks of a reply
fn response_text(response: &ClaudeResponse) -> String {
    response
        .content
        .iter()
        .filter(|block| block.block_type == "text")
        .map(|block| block.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
