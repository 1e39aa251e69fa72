//! Prompt templates for the five model calls of an analysis run.
//!
//! Item lists are rendered as `- item` bullet lines between `# HEADING` and
//! `# END OF HEADING` delimiters so responses can be checked against them.

use crate::domain::CategoryKind;

/// Heading that only the mapping prompt carries.
pub const CATEGORIES_MARKER: &str = "# CATEGORIES";

/// Heading that only the extraction prompt carries.
pub const RAW_ANALYSIS_MARKER: &str = "# RAW ANALYSIS";

/// Open-ended descriptive pass over one raw report.
pub fn analysis_prompt(raw_experience: &str) -> String {
    format!(
        r#"You are a psychedelic experience analyst. You analyze first-person reports written by people who have had a psychedelic experience.
For each report you look for:
- Substance used
- Age
- Gender
- Raw Experience
----
The report is below:
# PSYCHEDELIC EXPERIENCE REPORT
Raw Experience: {raw_experience}
----
Identify the following information from the trip report:
---
1. Common themes
2. Substance used
3. Age of reporter
4. Gender of reporter
5. Common emotions
---
If gender or age is not available say that they are "N/A". Begin!"#
    )
}

/// Structured extraction over the descriptive pass. Expects a JSON object back.
pub fn extraction_prompt(raw_analysis: &str) -> String {
    format!(
        r#"You are a psychedelic experience analyst. You extract structured data from analyses of psychedelic experiences.
The analysis of one experience is below:
{RAW_ANALYSIS_MARKER}
{raw_analysis}
----
Identify the most common themes and emotions in the trip report, the substance used, and the age and gender of the reporter. Return them in the following JSON format:
{{
    "substance": "<substance name>",
    "themes": ["<Theme 1>", "<Theme 2>", "<Theme 3>"],
    "emotions": ["<Emotion 1>", "<Emotion 2>", "<Emotion 3>"],
    "age": "<age>",
    "gender": "<gender>"
}}
----
If no specific age or gender is mentioned, use "N/A" for those fields.
Begin!"#
    )
}

fn bullets<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|i| format!("- {}", i.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ask for high-level categories over a list of themes or emotions.
///
/// The caller is responsible for removing duplicates from `items`.
pub fn broad_categories_prompt(kind: CategoryKind, items: &[String]) -> String {
    let heading = kind.heading();
    let key = kind.broad_key();
    let noun = heading.to_lowercase();
    format!(
        r#"You are a psychedelic experience analyst. You find the broad {noun} shared by a group of people who have had a psychedelic experience.
The {noun} found in their trip reports are listed below:
# {heading}
{items}
# END OF {heading}
Return the high-level categories in the following JSON format:
{{
    "{key}": ["<Category 1>", "<Category 2>", "<Category 3>"]
}}
----
Begin!"#,
        items = bullets(items),
    )
}

/// Ask the model to place every individual item into one of `categories`.
///
/// `items` is passed through as-is, duplicates included.
pub fn map_to_categories_prompt(
    kind: CategoryKind,
    categories: &[String],
    items: &[String],
) -> String {
    let label = kind.label();
    let heading = kind.heading();
    format!(
        r#"You are a psychedelic experience analyst. You group the {label} items found in a set of trip reports.
Group the {label} items into the following categories:
{CATEGORIES_MARKER}
{categories}
# END OF CATEGORIES

The {label} items found in the trip reports are listed below:
# {heading}
{items}
# END OF {heading}
---
Return the grouping in the following JSON format, one key per category, using the category names exactly as given:
{{
    "<{label} category 1>": ["<{label} 1>", "<{label} 2>", "<{label} 3>"],
    "<{label} category 2>": ["<{label} 4>", "<{label} 5>", "<{label} 6>"]
}}
----
Begin!"#,
        categories = bullets(categories),
        items = bullets(items),
    )
}

/// Bullet entries between the `start` and `end` heading lines of a rendered prompt.
pub fn bullet_items(prompt: &str, start: &str, end: &str) -> Vec<String> {
    prompt
        .lines()
        .map(str::trim)
        .skip_while(|line| *line != start)
        .skip(1)
        .take_while(|line| *line != end)
        .filter_map(|line| line.strip_prefix("- "))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_prompt_embeds_report() {
        let prompt = analysis_prompt("I took a small dose and saw fractals.");
        assert!(prompt.contains("Raw Experience: I took a small dose and saw fractals."));
        assert!(!prompt.contains(RAW_ANALYSIS_MARKER));
    }

    #[test]
    fn test_extraction_prompt_has_literal_braces() {
        let prompt = extraction_prompt("analysis text");
        assert!(prompt.contains(RAW_ANALYSIS_MARKER));
        assert!(prompt.contains("\"substance\": \"<substance name>\""));
        assert!(prompt.contains("{\n"));
    }

    #[test]
    fn test_broad_prompt_lists_items() {
        let items = vec!["fear".to_string(), "awe".to_string()];
        let prompt = broad_categories_prompt(CategoryKind::Emotion, &items);
        assert!(prompt.contains("\"common_emotions\""));
        assert_eq!(
            bullet_items(&prompt, "# EMOTIONS", "# END OF EMOTIONS"),
            vec!["fear", "awe"]
        );
    }

    #[test]
    fn test_mapping_prompt_sections() {
        let categories = vec!["primal".to_string(), "cosmic".to_string()];
        let items = vec!["fear".to_string(), "awe".to_string(), "fear".to_string()];
        let prompt = map_to_categories_prompt(CategoryKind::Theme, &categories, &items);
        assert_eq!(
            bullet_items(&prompt, "# CATEGORIES", "# END OF CATEGORIES"),
            categories
        );
        assert_eq!(bullet_items(&prompt, "# THEMES", "# END OF THEMES"), items);
        assert!(prompt.contains("group the theme items"));
    }

    #[test]
    fn test_bullet_items_missing_section() {
        assert!(bullet_items("no sections here", "# THEMES", "# END OF THEMES").is_empty());
    }
}
