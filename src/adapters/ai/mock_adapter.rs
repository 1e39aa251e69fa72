//! Mock model adapters for running without API calls.
//!
//! - [`MockModelAdapter`]: recognises which prompt it was given and answers with
//!   canned, well-formed responses. Used when no API key is configured.
//! - [`ScriptedModelAdapter`]: replays a queue of responses and records every prompt.

use crate::domain::DomainError;
use crate::ports::{ModelPort, ResponseMode};
use crate::usecases::prompts;
use serde_json::json;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

/// Mock model adapter.
///
/// Returns predetermined responses without making API calls.
/// Simulates network latency with configurable delay.
pub struct MockModelAdapter {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
}

impl MockModelAdapter {
    /// Create a new mock adapter with default delay (100ms).
    pub fn new() -> Self {
        Self { delay_ms: 100 }
    }

    /// Create a mock adapter with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self { delay_ms }
    }

    fn answer(prompt: &str) -> String {
        if prompt.contains(prompts::CATEGORIES_MARKER) {
            // Put every item into the first category offered.
            let categories = prompts::bullet_items(prompt, "# CATEGORIES", "# END OF CATEGORIES");
            let items = prompts::bullet_items(prompt, "# THEMES", "# END OF THEMES")
                .into_iter()
                .chain(prompts::bullet_items(prompt, "# EMOTIONS", "# END OF EMOTIONS"))
                .collect::<Vec<_>>();
            let label = categories
                .into_iter()
                .next()
                .unwrap_or_else(|| "[MOCK] Uncategorized".to_string());
            let mut mapping = serde_json::Map::new();
            mapping.insert(label, json!(items));
            return serde_json::Value::Object(mapping).to_string();
        }
        if prompt.contains("\"common_themes\"") {
            return json!({"common_themes": ["[MOCK] Inner Journey", "[MOCK] Perception"]})
                .to_string();
        }
        if prompt.contains("\"common_emotions\"") {
            return json!({"common_emotions": ["[MOCK] Elation", "[MOCK] Unease"]}).to_string();
        }
        if prompt.contains(prompts::RAW_ANALYSIS_MARKER) {
            return json!({
                "substance": "[MOCK] Unknown",
                "themes": ["[MOCK] introspection", "[MOCK] visual distortion"],
                "emotions": ["[MOCK] wonder", "[MOCK] anxiety"],
                "age": "N/A",
                "gender": "N/A"
            })
            .to_string();
        }
        format!(
            "[MOCK] Descriptive analysis of a {}-character trip report. \
             In production, the model would describe themes, substance, age, \
             gender and emotions here.",
            prompt.len()
        )
    }
}

impl Default for MockModelAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ModelPort for MockModelAdapter {
    async fn complete(&self, prompt: &str, mode: ResponseMode) -> Result<String, DomainError> {
        info!(
            prompt_len = prompt.len(),
            json = mode == ResponseMode::Json,
            "[MOCK] Simulating chat completion"
        );

        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;

        Ok(Self::answer(prompt))
    }
}

/// One recorded call to a [`ScriptedModelAdapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub prompt: String,
    pub mode: ResponseMode,
}

/// Replays queued responses in order. Errors once the queue runs dry.
#[derive(Default)]
pub struct ScriptedModelAdapter {
    responses: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedModelAdapter {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|r| Ok(r.into())).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response.
    pub async fn push(&self, response: impl Into<String>) {
        self.responses.lock().await.push_back(Ok(response.into()));
    }

    /// Queue a transport failure.
    pub async fn push_error(&self, message: impl Into<String>) {
        self.responses.lock().await.push_back(Err(message.into()));
    }

    /// Every call made so far, oldest first.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    pub async fn remaining(&self) -> usize {
        self.responses.lock().await.len()
    }
}

#[async_trait::async_trait]
impl ModelPort for ScriptedModelAdapter {
    async fn complete(&self, prompt: &str, mode: ResponseMode) -> Result<String, DomainError> {
        self.calls.lock().await.push(RecordedCall {
            prompt: prompt.to_string(),
            mode,
        });
        match self.responses.lock().await.pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(DomainError::Model(message)),
            None => Err(DomainError::Model("scripted responses exhausted".to_string())),
        }
    }
}
