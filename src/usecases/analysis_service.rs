//! Analysis service. Orchestrates the per-report and run-level workflow.
//!
//! Coordinates between the model (analysis), the categorizer, and the result store (JSON files).

use crate::domain::{AnalysisResult, Dataset, DomainError, RunSummary, SessionId};
use crate::ports::{ModelPort, ResponseMode, ResultStorePort};
use crate::usecases::aggregation::aggregate_mapping_counts;
use crate::usecases::categorization::Categorizer;
use crate::usecases::prompts;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Service for LLM-powered trip report analysis.
///
/// Orchestrates the flow:
/// 1. Descriptive pass and JSON extraction for each selected report
/// 2. Broad category discovery over all themes and emotions
/// 3. Mapping of individual items into those categories
/// 4. Counting, then saving the aggregate next to the per-report files
pub struct AnalysisService {
    model: Arc<dyn ModelPort>,
    store: Arc<dyn ResultStorePort>,
    categorizer: Categorizer,
}

impl AnalysisService {
    /// Create a new analysis service.
    ///
    /// # Arguments
    /// * `model` - Model port implementation (OpenAI, Mock, etc.)
    /// * `store` - Where per-report and aggregate JSON is written
    pub fn new(model: Arc<dyn ModelPort>, store: Arc<dyn ResultStorePort>) -> Self {
        Self {
            categorizer: Categorizer::new(Arc::clone(&model)),
            model,
            store,
        }
    }

    /// Analyze one report.
    ///
    /// Returns `Ok(None)` when the extraction response is not valid JSON or does
    /// not have the record shape; nothing is written in that case. Transport
    /// errors are returned as `Err`.
    pub async fn run_analysis(
        &self,
        raw_experience: &str,
        title: &str,
        session: &SessionId,
    ) -> Result<Option<AnalysisResult>, DomainError> {
        let raw_analysis = self
            .model
            .complete(&prompts::analysis_prompt(raw_experience), ResponseMode::Text)
            .await?;
        let extraction = self
            .model
            .complete(&prompts::extraction_prompt(&raw_analysis), ResponseMode::Json)
            .await?;

        let data: serde_json::Value = match serde_json::from_str(&extraction) {
            Ok(value) => value,
            Err(e) => {
                warn!(title, error = %e, "extraction is not valid JSON, skipping report");
                return Ok(None);
            }
        };
        let result = match AnalysisResult::from_extraction(&data) {
            Ok(result) => result,
            Err(e) => {
                warn!(title, error = %e, "extraction failed validation, skipping report");
                return Ok(None);
            }
        };

        self.store.save_report(session, title, &data).await?;
        Ok(Some(result))
    }

    /// Analyze the selected reports of a dataset, categorize, count and persist.
    ///
    /// Per-report failures are logged and the title is listed in
    /// [`RunSummary::skipped`]; categorization or persistence failures abort the run.
    pub async fn run_analysis_and_categorize(
        &self,
        dataset: &Dataset,
        selected_titles: &[String],
    ) -> Result<RunSummary, DomainError> {
        let session = SessionId::new();
        let started_at = Utc::now();
        info!(
            session = %session,
            dataset = %dataset.name,
            reports = selected_titles.len(),
            "starting analysis run"
        );

        let mut all_themes = Vec::new();
        let mut all_emotions = Vec::new();
        let mut analysis_results = Vec::new();
        let mut skipped = Vec::new();

        for title in selected_titles {
            let Some(report) = dataset.find(title) else {
                warn!(title = %title, dataset = %dataset.name, "report not found in dataset");
                skipped.push(title.clone());
                continue;
            };
            match self.run_analysis(&report.text, title, &session).await {
                Ok(Some(result)) => {
                    info!(
                        title = %title,
                        substance = %result.substance,
                        themes = result.themes.len(),
                        emotions = result.emotions.len(),
                        "report analyzed"
                    );
                    all_themes.extend(result.themes.iter().cloned());
                    all_emotions.extend(result.emotions.iter().cloned());
                    analysis_results.push(result);
                }
                Ok(None) => skipped.push(title.clone()),
                Err(e) => {
                    warn!(title = %title, error = %e, "error while analyzing report");
                    skipped.push(title.clone());
                }
            }
        }

        let categorization = self.categorizer.categorize(&all_themes, &all_emotions).await?;
        let theme_counts = aggregate_mapping_counts(&categorization.theme_mapping);
        let emotion_counts = aggregate_mapping_counts(&categorization.emotion_mapping);

        let aggregate = json!({
            "theme_counts": theme_counts,
            "emotion_counts": emotion_counts,
            "analysis_results": analysis_results,
        });
        let path = self.store.save_aggregate(&session, &aggregate).await?;

        info!(
            session = %session,
            analyzed = analysis_results.len(),
            skipped = skipped.len(),
            path = %path.display(),
            "analysis run complete"
        );

        Ok(RunSummary {
            session_id: session,
            started_at,
            theme_counts,
            emotion_counts,
            analysis_results,
            skipped,
        })
    }
}
