// Generation client
//
// Sends a compiled instruction to a structured-completion backend and turns
// the raw reply into a `PlaylistResult`. The reply is untrusted: it must
// parse into `{"playlist": [string]}` or the call fails. Catalog membership
// is not checked here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

/// What the backend is asked to produce
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub instruction: String,
    pub output_schema: Value,
}

/// Parsed, shape-checked backend output. Titles keep the backend's order and
/// are not deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistResult {
    pub playlist: Vec<String>,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    /// The backend could not be reached or refused the request
    #[error("generation backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered, but not with `{"playlist": [string]}`
    #[error("generation output did not match schema: {0}")]
    Schema(String),
}

/// A structured-completion service. Implementations return the raw text of
/// the reply; shape checking happens in `GenerationClient`.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn complete(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// JSON Schema for `PlaylistResult`
pub fn playlist_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "playlist": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Song titles chosen for the playlist, in play order"
            }
        },
        "required": ["playlist"]
    })
}

#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn GenerationBackend>,
}

impl GenerationClient {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// One backend call, no retries.
    pub async fn generate(&self, instruction: String) -> Result<PlaylistResult, GenerationError> {
        let request = GenerationRequest {
            instruction,
            output_schema: playlist_schema(),
        };

        let raw = self.backend.complete(&request).await?;
        parse_playlist(&raw)
    }
}

/// Parse a raw backend reply into a `PlaylistResult`
pub fn parse_playlist(raw: &str) -> Result<PlaylistResult, GenerationError> {
    let json_text = extract_json(raw)?;
    serde_json::from_str::<PlaylistResult>(json_text)
        .map_err(|e| GenerationError::Schema(format!("Failed to parse playlist response: {}", e)))
}

/// Extract JSON from response text (handles markdown code blocks)
fn extract_json(text: &str) -> Result<&str, GenerationError> {
    // Fenced ```json block
    if let Some(start) = text.find("```json") {
        let json_start = start + "```json".len();
        if let Some(end) = text[json_start..].find("```") {
            return Ok(text[json_start..json_start + end].trim());
        }
    }

    // Generic fenced block
    if let Some(start) = text.find("```\n") {
        let json_start = start + "```\n".len();
        if let Some(end) = text[json_start..].find("```") {
            return Ok(text[json_start..json_start + end].trim());
        }
    }

    // Raw object: the first `{` that opens a complete JSON value
    for (start, _) in text.match_indices('{') {
        let mut values = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        if let Some(Ok(_)) = values.next() {
            return Ok(&text[start..start + values.byte_offset()]);
        }
    }

    Err(GenerationError::Schema("No JSON found in response".to_string()))
}
