//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{Dataset, DomainError, SessionId};
use std::path::PathBuf;

/// How the model should shape its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Free text.
    Text,
    /// JSON object only (`response_format = json_object`).
    Json,
}

/// Chat-completion model. One user message in, the first choice's content out.
#[async_trait::async_trait]
pub trait ModelPort: Send + Sync {
    async fn complete(&self, prompt: &str, mode: ResponseMode) -> Result<String, DomainError>;
}

/// Writes run artifacts as JSON blobs named after the session.
#[async_trait::async_trait]
pub trait ResultStorePort: Send + Sync {
    /// Persist one report's raw extraction object as `<session>-<title>.json`.
    async fn save_report(
        &self,
        session: &SessionId,
        title: &str,
        data: &serde_json::Value,
    ) -> Result<PathBuf, DomainError>;

    /// Persist the run aggregate as `<session>-aggregated_analysis.json`.
    async fn save_aggregate(
        &self,
        session: &SessionId,
        data: &serde_json::Value,
    ) -> Result<PathBuf, DomainError>;
}

/// Source of report collections.
#[async_trait::async_trait]
pub trait DatasetPort: Send + Sync {
    /// Load every dataset the source knows about, sorted by name.
    async fn load_datasets(&self) -> Result<Vec<Dataset>, DomainError>;
}

/// Fetches raw HTML for the scraper.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, DomainError>;
}
