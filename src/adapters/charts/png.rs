//! PNG rendering of charts with `plotters`, used for on-disk image export.

use super::{ChartSpec, emotion_chart, theme_chart};
use crate::domain::{DomainError, RunSummary};
use plotters::prelude::*;
use std::f64::consts::PI;
use std::path::{Path, PathBuf};
use tracing::info;

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 700;

/// Plotly's default qualitative palette.
const PALETTE: [RGBColor; 10] = [
    RGBColor(0x63, 0x6e, 0xfa),
    RGBColor(0xef, 0x55, 0x3b),
    RGBColor(0x00, 0xcc, 0x96),
    RGBColor(0xab, 0x63, 0xfa),
    RGBColor(0xff, 0xa1, 0x5a),
    RGBColor(0x19, 0xd3, 0xf3),
    RGBColor(0xff, 0x66, 0x92),
    RGBColor(0xb6, 0xe8, 0x80),
    RGBColor(0xff, 0x97, 0xff),
    RGBColor(0xfe, 0xcb, 0x52),
];

fn chart_err(e: impl std::fmt::Display) -> DomainError {
    DomainError::Chart(e.to_string())
}

/// Points of one pie slice, from `start` sweeping `sweep` radians.
fn sector(center: (i32, i32), radius: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = ((sweep.to_degrees()).ceil() as usize).max(1);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for i in 0..=steps {
        let angle = start + sweep * i as f64 / steps as f64;
        points.push((
            center.0 + (radius * angle.cos()).round() as i32,
            center.1 + (radius * angle.sin()).round() as i32,
        ));
    }
    points
}

fn draw_pie(path: &Path, spec: &ChartSpec) -> Result<(), DomainError> {
    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    let area = root
        .titled(spec.title(), ("sans-serif", 30))
        .map_err(chart_err)?;

    let counts = spec.counts();
    let total: usize = counts.values().sum();
    if total > 0 {
        let (w, h) = area.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = f64::from(w.min(h)) * 0.42;

        let mut start = -PI / 2.0;
        for (i, (label, count)) in counts.iter().filter(|(_, c)| **c > 0).enumerate() {
            let share = *count as f64 / total as f64;
            let sweep = share * 2.0 * PI;
            let color = PALETTE[i % PALETTE.len()];
            area.draw(&Polygon::new(sector(center, radius, start, sweep), color.filled()))
                .map_err(chart_err)?;

            let mid = start + sweep / 2.0;
            let at = (
                center.0 + (radius * 0.62 * mid.cos()) as i32,
                center.1 + (radius * 0.62 * mid.sin()) as i32,
            );
            area.draw(&Text::new(
                format!("{} {:.1}%", label, share * 100.0),
                at,
                ("sans-serif", 16).into_font().color(&WHITE),
            ))
            .map_err(chart_err)?;
            start += sweep;
        }
    }
    root.present().map_err(chart_err)
}

fn draw_bar(path: &Path, spec: &ChartSpec) -> Result<(), DomainError> {
    let ChartSpec::Bar {
        title,
        x_title,
        y_title,
        counts,
    } = spec
    else {
        return Err(DomainError::Chart("not a bar chart".to_string()));
    };

    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let labels: Vec<&String> = counts.keys().collect();
    let slots = labels.len().max(1) as i32;
    let y_max = counts.values().copied().max().unwrap_or(0).max(1) as f64 * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(title.as_str(), ("sans-serif", 30))
        .margin(15)
        .x_label_area_size(120)
        .y_label_area_size(60)
        .build_cartesian_2d(0..slots, 0f64..y_max)
        .map_err(chart_err)?;

    let label_of = |x: &i32| {
        labels
            .get(*x as usize)
            .map(|s| s.to_string())
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().max(1))
        .x_label_formatter(&label_of)
        .x_desc(x_title.as_str())
        .y_desc(y_title.as_str())
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(counts.values().enumerate().map(|(i, count)| {
            let x = i as i32;
            let mut bar = Rectangle::new([(x, 0.0), (x + 1, *count as f64)], PALETTE[0].filled());
            bar.set_margin(0, 0, 8, 8);
            bar
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)
}

/// Render a chart to a PNG file at `path`.
pub fn render_png(spec: &ChartSpec, path: &Path) -> Result<(), DomainError> {
    match spec {
        ChartSpec::Pie { .. } => draw_pie(path, spec),
        ChartSpec::Bar { .. } => draw_bar(path, spec),
    }
}

/// Write `<dir>/<filename>.png`, creating `dir` if needed.
pub async fn export_visualization(
    spec: &ChartSpec,
    dir: &Path,
    filename: &str,
) -> Result<PathBuf, DomainError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| DomainError::Chart(format!("create {}: {}", dir.display(), e)))?;
    let path = dir.join(format!("{}.png", filename));

    let owned_spec = spec.clone();
    let target = path.clone();
    tokio::task::spawn_blocking(move || render_png(&owned_spec, &target))
        .await
        .map_err(|e| DomainError::Chart(format!("chart renderer panicked: {}", e)))??;

    info!(path = %path.display(), "chart exported");
    Ok(path)
}

/// Export the theme pie and emotion bar chart of a run, named after its session.
pub async fn export_run_charts(summary: &RunSummary, dir: &Path) -> Result<Vec<PathBuf>, DomainError> {
    let session = summary.session_id.as_str();
    let themes = export_visualization(
        &theme_chart(&summary.theme_counts),
        dir,
        &format!("{}-themes", session),
    )
    .await?;
    let emotions = export_visualization(
        &emotion_chart(&summary.emotion_counts),
        dir,
        &format!("{}-emotions", session),
    )
    .await?;
    Ok(vec![themes, emotions])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AggregatedCounts, SessionId};
    use chrono::Utc;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn counts(items: &[(&str, usize)]) -> AggregatedCounts {
        items.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn assert_png(path: &Path) {
        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.starts_with(PNG_MAGIC), "{} is not a PNG", path.display());
    }

    #[test]
    fn test_sector_spans_the_sweep() {
        let points = sector((100, 100), 50.0, 0.0, PI / 2.0);
        assert_eq!(points[0], (100, 100));
        assert_eq!(points[1], (150, 100));
        assert_eq!(*points.last().unwrap(), (100, 150));
    }

    #[test]
    fn test_render_pie_and_bar() {
        let dir = tempfile::tempdir().unwrap();
        let pie = dir.path().join("pie.png");
        let bar = dir.path().join("bar.png");
        render_png(&theme_chart(&counts(&[("a", 1), ("b", 2), ("c", 3)])), &pie).unwrap();
        render_png(&emotion_chart(&counts(&[("fear & dread", 2), ("joy", 5)])), &bar).unwrap();
        assert_png(&pie);
        assert_png(&bar);
    }

    #[test]
    fn test_empty_charts_still_render() {
        let dir = tempfile::tempdir().unwrap();
        let pie = dir.path().join("pie.png");
        let bar = dir.path().join("bar.png");
        render_png(&theme_chart(&AggregatedCounts::new()), &pie).unwrap();
        render_png(&emotion_chart(&AggregatedCounts::new()), &bar).unwrap();
        assert_png(&pie);
        assert_png(&bar);
    }

    #[tokio::test]
    async fn test_export_run_charts_writes_png_files() {
        let dir = tempfile::tempdir().unwrap();
        let summary = RunSummary {
            session_id: SessionId::from("s9"),
            started_at: Utc::now(),
            theme_counts: counts(&[("primal", 4)]),
            emotion_counts: counts(&[("joy", 1)]),
            analysis_results: vec![],
            skipped: vec![],
        };
        let paths = export_run_charts(&summary, &dir.path().join("visualizations"))
            .await
            .unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("visualizations/s9-themes.png"));
        assert!(paths[1].ends_with("visualizations/s9-emotions.png"));
        for path in &paths {
            assert_png(path);
        }
    }
}
