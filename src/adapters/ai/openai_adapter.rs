//! OpenAI-compatible chat-completion adapter.
//!
//! Supports OpenAI API, Azure OpenAI, and local Ollama instances.
//! Implements `ModelPort`: one user message per call, optional JSON response format.

use crate::domain::DomainError;
use crate::ports::{ModelPort, ResponseMode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// OpenAI-compatible model adapter.
///
/// Can be configured to work with:
/// - OpenAI API (api.openai.com)
/// - Azure OpenAI
/// - Ollama (localhost)
/// - Any OpenAI-compatible API
pub struct OpenAiAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiAdapter {
    /// Create a new OpenAI adapter.
    ///
    /// # Arguments
    /// * `api_url` - API endpoint (e.g., "https://api.openai.com/v1/chat/completions")
    /// * `api_key` - API key (can be empty for local Ollama)
    /// * `model` - Model name (e.g., "gpt-3.5-turbo-1106", "llama3.2")
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, prompt: &str, mode: ResponseMode) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            response_format: match mode {
                ResponseMode::Json => Some(ResponseFormat {
                    format_type: "json_object".to_string(),
                }),
                ResponseMode::Text => None,
            },
        }
    }

    /// Pull the first choice's content out of a decoded response.
    fn first_content(response: ChatResponse) -> Result<String, DomainError> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DomainError::Model("No response choices returned".to_string()))
    }
}

/// OpenAI API request structure.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// OpenAI API response structure.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

#[async_trait::async_trait]
impl ModelPort for OpenAiAdapter {
    async fn complete(&self, prompt: &str, mode: ResponseMode) -> Result<String, DomainError> {
        debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            json = mode == ResponseMode::Json,
            "sending chat completion"
        );

        let request = self.build_request(prompt, mode);

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::Model(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "model API returned error");
            return Err(DomainError::Model(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Model(format!("Failed to parse API response: {}", e)))?;

        let content = Self::first_content(chat_response)?;
        debug!(content_len = content.len(), "received model response");
        Ok(content)
    }
}
