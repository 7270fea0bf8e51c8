//! PNG rendering of one chart with plotters

use std::fmt::Display;
use std::path::Path;

use plotters::prelude::*;

use crate::error::{AppError, AppResult};

use super::series::{ChartData, Series};

const TITLE_FONT_SIZE: u32 = 24;
const LABEL_FONT_SIZE: u32 = 14;
const LINE_WIDTH: u32 = 2;

fn chart_err(e: impl Display) -> AppError {
    AppError::Chart(e.to_string())
}

fn color_of(name: &str) -> RGBColor {
    match name {
        "pink" => RGBColor(255, 192, 203),
        "purple" => RGBColor(128, 0, 128),
        "gray" => RGBColor(128, 128, 128),
        _ => BLACK,
    }
}

/// Split a series into runs of finite points so failed sizes leave a gap.
fn finite_segments(series: &Series, label_start: u32) -> Vec<Vec<(f64, f64)>> {
    let mut segments = vec![Vec::new()];
    for (index, value) in series.points(label_start) {
        if value.is_finite() {
            if let Some(segment) = segments.last_mut() {
                segment.push((index as f64, value));
            }
        } else if segments.last().is_some_and(|s| !s.is_empty()) {
            segments.push(Vec::new());
        }
    }
    segments.retain(|s| !s.is_empty());
    segments
}

/// Draw `chart` as a line chart, one line per language, into `path`.
pub fn render_chart(chart: &ChartData, path: &Path, width: u32, height: u32) -> AppResult<()> {
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let x_max = (chart.labels.len() as f64 - 1.0).max(1.0);
    let y_max = if chart.y_max > 0.0 { chart.y_max } else { 1.0 };

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.name, ("sans-serif", TITLE_FONT_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)
        .map_err(chart_err)?;

    let labels = &chart.labels;
    ctx.configure_mesh()
        .x_labels(labels.len().max(2))
        .x_label_formatter(&|x| {
            let idx = x.round();
            if (x - idx).abs() < 0.3 && idx >= 0.0 {
                labels.get(idx as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .y_desc("Seconds")
        .x_desc("Size")
        .label_style(("sans-serif", LABEL_FONT_SIZE))
        .draw()
        .map_err(chart_err)?;

    for series in &chart.series {
        let color = color_of(series.color);
        let segments = finite_segments(series, chart.label_start);

        // Legend entry hangs off the first drawn element; draw an empty
        // line when nothing finite was measured.
        let mut legend_drawn = false;
        for segment in segments.into_iter().chain(std::iter::once(Vec::new())) {
            if legend_drawn && segment.is_empty() {
                continue;
            }
            let annotation = ctx
                .draw_series(LineSeries::new(segment, color.stroke_width(LINE_WIDTH)))
                .map_err(chart_err)?;
            if !legend_drawn {
                annotation
                    .label(series.language.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH)));
                legend_drawn = true;
            }
        }
    }

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", LABEL_FONT_SIZE))
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}
