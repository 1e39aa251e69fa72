//! Chart adapters. Plotly figure specs for the browser, PNG files for export.

pub mod figures;
pub mod png;

pub use figures::{emotion_bar_chart, theme_pie_chart};
pub use png::{export_run_charts, export_visualization, render_png};

use crate::domain::AggregatedCounts;

/// What a chart shows, independent of how it is rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    Pie {
        title: String,
        counts: AggregatedCounts,
    },
    Bar {
        title: String,
        x_title: String,
        y_title: String,
        counts: AggregatedCounts,
    },
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Pie { title, .. } | ChartSpec::Bar { title, .. } => title,
        }
    }

    pub fn counts(&self) -> &AggregatedCounts {
        match self {
            ChartSpec::Pie { counts, .. } | ChartSpec::Bar { counts, .. } => counts,
        }
    }
}

/// Pie chart of theme counts.
pub fn theme_chart(counts: &AggregatedCounts) -> ChartSpec {
    ChartSpec::Pie {
        title: "Common Themes".to_string(),
        counts: counts.clone(),
    }
}

/// Bar chart of emotion counts.
pub fn emotion_chart(counts: &AggregatedCounts) -> ChartSpec {
    ChartSpec::Bar {
        title: "Emotions Distribution".to_string(),
        x_title: "Emotion".to_string(),
        y_title: "Count".to_string(),
        counts: counts.clone(),
    }
}
