//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/IO types here. Adapters map model responses and CSV rows into these.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Placeholder used when a report does not state the author's age or gender.
pub const NOT_AVAILABLE: &str = "N/A";

/// A single trip report row: title plus the raw experience narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub text: String,
}

/// A named collection of reports loaded from one CSV file.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub name: String,
    pub path: PathBuf,
    pub reports: Vec<Report>,
}

impl Dataset {
    /// Report titles in file order. Duplicated titles are listed once each time they occur.
    pub fn titles(&self) -> Vec<&str> {
        self.reports.iter().map(|r| r.title.as_str()).collect()
    }

    /// First report with the given title.
    pub fn find(&self, title: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.title == title)
    }
}

/// Structured fields extracted from one report.
///
/// Only ever built from a model response that passed validation
/// (see [`AnalysisResult::from_extraction`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub substance: String,
    pub themes: Vec<String>,
    pub emotions: Vec<String>,
    pub age: String,
    pub gender: String,
}

/// Shape the extraction prompt asks the model for. Extra keys are ignored.
#[derive(Deserialize)]
struct ExtractionShape {
    substance: String,
    themes: Vec<String>,
    emotions: Vec<String>,
    #[serde(default)]
    age: Option<String>,
    #[serde(default)]
    gender: Option<String>,
}

fn or_not_available(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_AVAILABLE.to_string(),
    }
}

impl AnalysisResult {
    /// Validate a decoded extraction object.
    ///
    /// Returns the serde message on mismatch; the record is never repaired.
    pub fn from_extraction(value: &serde_json::Value) -> Result<Self, String> {
        let shape = ExtractionShape::deserialize(value).map_err(|e| e.to_string())?;
        Ok(Self {
            substance: shape.substance,
            themes: shape.themes,
            emotions: shape.emotions,
            age: or_not_available(shape.age),
            gender: or_not_available(shape.gender),
        })
    }
}

/// Which list a categorization step works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Theme,
    Emotion,
}

impl CategoryKind {
    /// Singular label used inside prompts ("theme" / "emotion").
    pub fn label(self) -> &'static str {
        match self {
            CategoryKind::Theme => "theme",
            CategoryKind::Emotion => "emotion",
        }
    }

    /// Upper-case delimiter heading used inside prompts.
    pub fn heading(self) -> &'static str {
        match self {
            CategoryKind::Theme => "THEMES",
            CategoryKind::Emotion => "EMOTIONS",
        }
    }

    /// JSON key the broad-category response must carry.
    pub fn broad_key(self) -> &'static str {
        match self {
            CategoryKind::Theme => "common_themes",
            CategoryKind::Emotion => "common_emotions",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Broad category labels found for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadCategorySet {
    pub themes: Vec<String>,
    pub emotions: Vec<String>,
}

/// Category label -> individual items the model placed there.
/// Neither exhaustive nor disjoint.
pub type CategoryMapping = BTreeMap<String, Vec<String>>;

/// Category label -> number of items mapped to it.
pub type AggregatedCounts = BTreeMap<String, usize>;

/// Run-scoped random token, used only as an output file prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Input items that no category received, and returned items that were never asked about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MappingCoverage {
    pub unplaced: Vec<String>,
    pub unknown: Vec<String>,
}

impl MappingCoverage {
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty() && self.unknown.is_empty()
    }
}

/// Everything one analysis run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub session_id: SessionId,
    pub started_at: DateTime<Utc>,
    pub theme_counts: AggregatedCounts,
    pub emotion_counts: AggregatedCounts,
    pub analysis_results: Vec<AnalysisResult>,
    /// Titles whose analysis failed or was rejected.
    pub skipped: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extraction_defaults_missing_age_and_gender() {
        let value = json!({
            "substance": "LSD",
            "themes": ["ego death", "nature"],
            "emotions": ["awe"]
        });
        let result = AnalysisResult::from_extraction(&value).unwrap();
        assert_eq!(result.substance, "LSD");
        assert_eq!(result.themes, vec!["ego death", "nature"]);
        assert_eq!(result.age, NOT_AVAILABLE);
        assert_eq!(result.gender, NOT_AVAILABLE);
    }

    #[test]
    fn test_extraction_null_and_empty_become_not_available() {
        let value = json!({
            "substance": "DMT",
            "themes": [],
            "emotions": [],
            "age": null,
            "gender": ""
        });
        let result = AnalysisResult::from_extraction(&value).unwrap();
        assert_eq!(result.age, NOT_AVAILABLE);
        assert_eq!(result.gender, NOT_AVAILABLE);
    }

    #[test]
    fn test_extraction_keeps_string_fields_and_ignores_extras() {
        let value = json!({
            "substance": "Psilocybin",
            "themes": ["fear"],
            "emotions": ["joy"],
            "age": "27",
            "gender": "female",
            "notes": "ignored"
        });
        let result = AnalysisResult::from_extraction(&value).unwrap();
        assert_eq!(result.age, "27");
        assert_eq!(result.gender, "female");
    }

    #[test]
    fn test_extraction_rejects_numeric_age() {
        let value = json!({
            "substance": "LSD",
            "themes": ["a"],
            "emotions": ["b"],
            "age": 27,
            "gender": "m"
        });
        assert!(AnalysisResult::from_extraction(&value).is_err());
    }

    #[test]
    fn test_extraction_rejects_wrong_shape() {
        let missing = json!({"themes": ["a"], "emotions": ["b"]});
        assert!(AnalysisResult::from_extraction(&missing).is_err());

        let wrong_type = json!({"substance": "LSD", "themes": "a, b", "emotions": []});
        assert!(AnalysisResult::from_extraction(&wrong_type).is_err());
    }

    #[test]
    fn test_dataset_find_returns_first_match() {
        let dataset = Dataset {
            name: "lsd".to_string(),
            path: PathBuf::from("data/lsd.csv"),
            reports: vec![
                Report { title: "A".into(), text: "first".into() },
                Report { title: "A".into(), text: "second".into() },
            ],
        };
        assert_eq!(dataset.find("A").unwrap().text, "first");
        assert!(dataset.find("B").is_none());
        assert_eq!(dataset.titles(), vec!["A", "A"]);
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }
}
