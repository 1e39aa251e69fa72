//! Frequency tallies over category mappings and per-report results.

use crate::domain::{AggregatedCounts, AnalysisResult, CategoryMapping, MappingCoverage};
use std::collections::HashSet;

/// Count how many items the model placed under each category.
///
/// Duplicated items count once per occurrence. A category that received no
/// items does not appear in the result.
pub fn aggregate_mapping_counts(mapping: &CategoryMapping) -> AggregatedCounts {
    let mut counts = AggregatedCounts::new();
    for (category, items) in mapping {
        for _ in items {
            *counts.entry(category.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Count individual themes and emotions directly, without broad categories.
pub fn tally_raw(results: &[AnalysisResult]) -> (AggregatedCounts, AggregatedCounts) {
    let mut themes = AggregatedCounts::new();
    let mut emotions = AggregatedCounts::new();
    for result in results {
        for theme in &result.themes {
            *themes.entry(theme.clone()).or_insert(0) += 1;
        }
        for emotion in &result.emotions {
            *emotions.entry(emotion.clone()).or_insert(0) += 1;
        }
    }
    (themes, emotions)
}

/// Compare the items sent to a mapping call with what came back.
pub fn mapping_coverage(items: &[String], mapping: &CategoryMapping) -> MappingCoverage {
    let placed: HashSet<&str> = mapping.values().flatten().map(String::as_str).collect();
    let asked: HashSet<&str> = items.iter().map(String::as_str).collect();

    let mut coverage = MappingCoverage::default();
    let mut seen = HashSet::new();
    for item in items {
        if !placed.contains(item.as_str()) && seen.insert(item.as_str()) {
            coverage.unplaced.push(item.clone());
        }
    }
    let mut seen = HashSet::new();
    for item in mapping.values().flatten() {
        if !asked.contains(item.as_str()) && seen.insert(item.as_str()) {
            coverage.unknown.push(item.clone());
        }
    }
    coverage
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_counts_include_duplicates() {
        let mut mapping = CategoryMapping::new();
        mapping.insert("primal".into(), strings(&["fear", "awe", "fear", "awe"]));
        mapping.insert("social".into(), strings(&["connection"]));

        let counts = aggregate_mapping_counts(&mapping);
        assert_eq!(counts["primal"], 4);
        assert_eq!(counts["social"], 1);
    }

    #[test]
    fn test_empty_category_is_absent() {
        let mut mapping = CategoryMapping::new();
        mapping.insert("empty".into(), vec![]);
        mapping.insert("full".into(), strings(&["x"]));

        let counts = aggregate_mapping_counts(&mapping);
        assert!(!counts.contains_key("empty"));
        assert_eq!(counts.len(), 1);
    }

    #[test]
    fn test_counts_equal_item_totals_for_overlapping_mapping() {
        let mut mapping = CategoryMapping::new();
        mapping.insert("a".into(), strings(&["x", "y", "z"]));
        mapping.insert("b".into(), strings(&["x", "x"]));

        let counts = aggregate_mapping_counts(&mapping);
        let total: usize = counts.values().sum();
        let items: usize = mapping.values().map(Vec::len).sum();
        assert_eq!(total, items);
        assert_eq!(counts["b"], 2);
    }

    #[test]
    fn test_tally_raw() {
        let results = vec![
            AnalysisResult {
                substance: "LSD".into(),
                themes: strings(&["fear", "awe"]),
                emotions: strings(&["joy"]),
                age: "N/A".into(),
                gender: "N/A".into(),
            },
            AnalysisResult {
                substance: "LSD".into(),
                themes: strings(&["fear"]),
                emotions: strings(&["dread"]),
                age: "30".into(),
                gender: "male".into(),
            },
        ];
        let (themes, emotions) = tally_raw(&results);
        assert_eq!(themes["fear"], 2);
        assert_eq!(themes["awe"], 1);
        assert_eq!(emotions.len(), 2);
    }

    #[test]
    fn test_mapping_coverage() {
        let items = strings(&["fear", "awe", "fear", "unity"]);
        let mut mapping = CategoryMapping::new();
        mapping.insert("primal".into(), strings(&["fear", "terror"]));
        mapping.insert("cosmic".into(), strings(&["awe"]));

        let coverage = mapping_coverage(&items, &mapping);
        assert_eq!(coverage.unplaced, strings(&["unity"]));
        assert_eq!(coverage.unknown, strings(&["terror"]));
        assert!(!coverage.is_complete());
    }
}
