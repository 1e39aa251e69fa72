//! AI adapter module. Implements ModelPort for LLM integration.
//!
//! Provides OpenAI-compatible adapter and mock adapters for offline runs and tests.

pub mod mock_adapter;
pub mod openai_adapter;

pub use mock_adapter::{MockModelAdapter, RecordedCall, ScriptedModelAdapter};
pub use openai_adapter::OpenAiAdapter;

use crate::ports::ModelPort;
use std::sync::Arc;
use tracing::{info, warn};

/// Pick the model for a run: OpenAI-compatible when a non-empty key is given,
/// otherwise the mock adapter.
pub fn model_for_key(api_url: String, model: String, api_key: Option<String>) -> Arc<dyn ModelPort> {
    match api_key.filter(|k| !k.trim().is_empty()) {
        Some(key) => {
            info!(model = %model, url = %api_url, "using OpenAI-compatible model");
            Arc::new(OpenAiAdapter::new(api_url, key, model))
        }
        None => {
            warn!("no API key set, using mock model adapter");
            Arc::new(MockModelAdapter::new())
        }
    }
}
