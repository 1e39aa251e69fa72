//! Plotly figure JSON. The dashboard page hands these straight to `Plotly.newPlot`.

use super::{ChartSpec, emotion_chart, theme_chart};
use crate::domain::AggregatedCounts;
use serde_json::{Value, json};

/// Plotly `{data, layout}` object for a chart.
pub fn plotly_figure(spec: &ChartSpec) -> Value {
    let labels: Vec<&String> = spec.counts().keys().collect();
    let values: Vec<usize> = spec.counts().values().copied().collect();
    match spec {
        ChartSpec::Pie { title, .. } => json!({
            "data": [{
                "type": "pie",
                "labels": labels,
                "values": values,
                "textposition": "inside",
                "textinfo": "percent+label"
            }],
            "layout": {"title": {"text": title}}
        }),
        ChartSpec::Bar {
            title,
            x_title,
            y_title,
            ..
        } => json!({
            "data": [{
                "type": "bar",
                "x": labels,
                "y": values
            }],
            "layout": {
                "title": {"text": title},
                "xaxis": {"title": {"text": x_title}},
                "yaxis": {"title": {"text": y_title}}
            }
        }),
    }
}

pub fn theme_pie_chart(counts: &AggregatedCounts) -> Value {
    plotly_figure(&theme_chart(counts))
}

pub fn emotion_bar_chart(counts: &AggregatedCounts) -> Value {
    plotly_figure(&emotion_chart(counts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(items: &[(&str, usize)]) -> AggregatedCounts {
        items.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_pie_figure() {
        let fig = theme_pie_chart(&counts(&[("primal", 4), ("cosmic", 1)]));
        assert_eq!(fig["data"][0]["type"], "pie");
        assert_eq!(fig["data"][0]["labels"], json!(["cosmic", "primal"]));
        assert_eq!(fig["data"][0]["values"], json!([1, 4]));
        assert_eq!(fig["data"][0]["textinfo"], "percent+label");
        assert_eq!(fig["layout"]["title"]["text"], "Common Themes");
    }

    #[test]
    fn test_bar_figure() {
        let fig = emotion_bar_chart(&counts(&[("joy", 2)]));
        assert_eq!(fig["data"][0]["type"], "bar");
        assert_eq!(fig["data"][0]["x"], json!(["joy"]));
        assert_eq!(fig["data"][0]["y"], json!([2]));
        assert_eq!(fig["layout"]["xaxis"]["title"]["text"], "Emotion");
        assert_eq!(fig["layout"]["yaxis"]["title"]["text"], "Count");
    }
}
