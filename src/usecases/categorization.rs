//! Categorization: broad category discovery plus item-to-category mapping.
//!
//! Call order per run is fixed: broad themes, broad emotions, theme mapping,
//! emotion mapping. Any malformed response aborts the whole step.

use crate::domain::{BroadCategorySet, CategoryKind, CategoryMapping, DomainError};
use crate::ports::{ModelPort, ResponseMode};
use crate::usecases::aggregation::mapping_coverage;
use crate::usecases::prompts;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Theme and emotion mappings for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categorization {
    pub broad: BroadCategorySet,
    pub theme_mapping: CategoryMapping,
    pub emotion_mapping: CategoryMapping,
}

/// Drop repeated items, keeping the first occurrence of each.
pub fn dedup_preserving_order(items: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .filter(|item| seen.insert(item.as_str()))
        .cloned()
        .collect()
}

fn decode_object(
    raw: &str,
    what: &str,
) -> Result<serde_json::Map<String, serde_json::Value>, DomainError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| {
        warn!(error = %e, json = %raw.chars().take(200).collect::<String>(), "JSON parse failed");
        DomainError::Categorization(format!("{} response is not valid JSON: {}", what, e))
    })?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(DomainError::Categorization(format!(
            "{} response is not a JSON object",
            what
        ))),
    }
}

/// Drives the categorization model calls.
pub struct Categorizer {
    model: Arc<dyn ModelPort>,
}

impl Categorizer {
    pub fn new(model: Arc<dyn ModelPort>) -> Self {
        Self { model }
    }

    /// Ask the model for high-level categories over `items`.
    ///
    /// Duplicates are removed before the prompt is built.
    pub async fn find_broad_categories(
        &self,
        kind: CategoryKind,
        items: &[String],
    ) -> Result<Vec<String>, DomainError> {
        let unique = dedup_preserving_order(items);
        let prompt = prompts::broad_categories_prompt(kind, &unique);
        let raw = self.model.complete(&prompt, ResponseMode::Json).await?;

        let mut object = decode_object(&raw, "broad category")?;
        let key = kind.broad_key();
        let list = object.remove(key).ok_or_else(|| {
            DomainError::Categorization(format!("broad category response is missing \"{}\"", key))
        })?;
        let categories = Vec::<String>::deserialize(list).map_err(|e| {
            DomainError::Categorization(format!("\"{}\" is not a list of strings: {}", key, e))
        })?;

        info!(
            kind = %kind,
            items = items.len(),
            unique = unique.len(),
            categories = ?categories,
            "broad categories found"
        );
        Ok(categories)
    }

    /// Ask the model to place each of `items` (duplicates kept) into `categories`.
    pub async fn map_individual_to_broad_categories(
        &self,
        kind: CategoryKind,
        items: &[String],
        categories: &[String],
    ) -> Result<CategoryMapping, DomainError> {
        let prompt = prompts::map_to_categories_prompt(kind, categories, items);
        let raw = self.model.complete(&prompt, ResponseMode::Json).await?;

        let object = decode_object(&raw, "category mapping")?;
        let mut mapping = CategoryMapping::new();
        for (label, value) in object {
            let assigned = Vec::<String>::deserialize(value).map_err(|e| {
                DomainError::Categorization(format!(
                    "category \"{}\" is not a list of strings: {}",
                    label, e
                ))
            })?;
            mapping.entry(label).or_default().extend(assigned);
        }

        let coverage = mapping_coverage(items, &mapping);
        if !coverage.is_complete() {
            warn!(
                kind = %kind,
                unplaced = ?coverage.unplaced,
                unknown = ?coverage.unknown,
                "category mapping does not match its input"
            );
        }
        info!(kind = %kind, categories = mapping.len(), "items mapped to broad categories");
        Ok(mapping)
    }

    /// Full categorization over the concatenated theme and emotion lists.
    ///
    /// A kind with no items at all is skipped without calling the model.
    pub async fn categorize(
        &self,
        themes: &[String],
        emotions: &[String],
    ) -> Result<Categorization, DomainError> {
        let mut out = Categorization::default();

        if !themes.is_empty() {
            out.broad.themes = self.find_broad_categories(CategoryKind::Theme, themes).await?;
        }
        if !emotions.is_empty() {
            out.broad.emotions = self
                .find_broad_categories(CategoryKind::Emotion, emotions)
                .await?;
        }
        if !themes.is_empty() {
            out.theme_mapping = self
                .map_individual_to_broad_categories(CategoryKind::Theme, themes, &out.broad.themes)
                .await?;
        }
        if !emotions.is_empty() {
            out.emotion_mapping = self
                .map_individual_to_broad_categories(
                    CategoryKind::Emotion,
                    emotions,
                    &out.broad.emotions,
                )
                .await?;
        }
        Ok(out)
    }
}
