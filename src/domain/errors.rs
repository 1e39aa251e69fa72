//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Model API error: {0}")]
    Model(String),

    /// Per-report extraction response was not valid JSON or did not match the record shape.
    #[error("Extraction rejected: {0}")]
    Extraction(String),

    #[error("Categorization failed: {0}")]
    Categorization(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Repository error: {0}")]
    Repo(String),

    #[error("Scrape failed: {0}")]
    Scrape(String),

    #[error("Chart export failed: {0}")]
    Chart(String),

    #[error("UI error: {0}")]
    Ui(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
