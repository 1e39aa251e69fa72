use super::DashboardState;
use super::error::{ApiError, ApiResult};
use crate::adapters::charts::{emotion_bar_chart, export_run_charts, theme_pie_chart};
use crate::domain::{AggregatedCounts, AnalysisResult};
use crate::usecases::AnalysisService;
use axum::{
    Json,
    extract::{Query, State},
    response::Html,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

const DASHBOARD_PAGE: &str = include_str!("dashboard.html");

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct DatasetInfo {
    pub name: String,
    pub reports: usize,
}

#[derive(Deserialize)]
pub struct TitlesQuery {
    pub dataset: String,
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub api_key: Option<String>,
    pub dataset: String,
    pub titles: Vec<String>,
    #[serde(default)]
    pub export: bool,
}

#[derive(Serialize)]
pub struct ChartFigures {
    pub themes: serde_json::Value,
    pub emotions: serde_json::Value,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub theme_counts: AggregatedCounts,
    pub emotion_counts: AggregatedCounts,
    pub analysis_results: Vec<AnalysisResult>,
    pub skipped: Vec<String>,
    pub charts: ChartFigures,
    pub exported: Vec<String>,
}

pub async fn index() -> Html<&'static str> {
    Html(DASHBOARD_PAGE)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn list_datasets(State(state): State<DashboardState>) -> Json<Vec<DatasetInfo>> {
    Json(
        state
            .datasets
            .values()
            .map(|d| DatasetInfo {
                name: d.name.clone(),
                reports: d.reports.len(),
            })
            .collect(),
    )
}

pub async fn dataset_titles(
    State(state): State<DashboardState>,
    Query(query): Query<TitlesQuery>,
) -> ApiResult<Json<Vec<String>>> {
    let dataset = state
        .datasets
        .get(&query.dataset)
        .ok_or_else(|| ApiError::NotFound(format!("dataset {}", query.dataset)))?;
    Ok(Json(dataset.titles().into_iter().map(str::to_string).collect()))
}

/// Run the whole pipeline for the selected reports. Responds when the run is done.
pub async fn analyze(
    State(state): State<DashboardState>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let dataset = state
        .datasets
        .get(&request.dataset)
        .ok_or_else(|| ApiError::NotFound(format!("dataset {}", request.dataset)))?;
    if request.titles.is_empty() {
        return Err(ApiError::BadRequest("select at least one report".to_string()));
    }

    info!(dataset = %dataset.name, reports = request.titles.len(), "dashboard analysis requested");
    let model = (state.model_factory)(request.api_key);
    let service = AnalysisService::new(model, Arc::clone(&state.store));
    let summary = service
        .run_analysis_and_categorize(dataset, &request.titles)
        .await?;

    let exported = if request.export {
        export_run_charts(&summary, &state.visualizations_dir)
            .await?
            .into_iter()
            .map(|p| p.display().to_string())
            .collect()
    } else {
        Vec::new()
    };

    Ok(Json(AnalyzeResponse {
        session_id: summary.session_id.to_string(),
        started_at: summary.started_at,
        charts: ChartFigures {
            themes: theme_pie_chart(&summary.theme_counts),
            emotions: emotion_bar_chart(&summary.emotion_counts),
        },
        theme_counts: summary.theme_counts,
        emotion_counts: summary.emotion_counts,
        analysis_results: summary.analysis_results,
        skipped: summary.skipped,
        exported,
    }))
}
