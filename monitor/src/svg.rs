//! SVG chart rendering backed by plotters.

use crate::render::{Frame, Panel, RenderError, Renderer};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// Colors cycled through for the series of one panel.
static SERIES_COLORS: [RGBColor; 2] = [BLUE, RED];

/// Renders frames into an SVG file.
///
/// Every render overwrites the previous file contents, so the chart on disk
/// always shows the latest frame.
pub struct SvgRenderer {
    path: PathBuf,
    size: (u32, u32),
}

impl SvgRenderer {
    /// Creates a renderer writing to `path` at the default size.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size: (960, 320),
        }
    }

    /// Overrides the drawing size in pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Path of the SVG file being written.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &Frame) -> Result<(), RenderError> {
        let root = SVGBackend::new(&self.path, self.size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        let panels = root.split_evenly((1, frame.panels.len().max(1)));
        for (area, panel) in panels.iter().zip(&frame.panels) {
            draw_panel(area, panel)?;
        }

        root.present().map_err(draw_error)?;
        Ok(())
    }
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
) -> Result<(), RenderError> {
    let epochs = panel
        .series
        .iter()
        .map(|series| series.points.len())
        .max()
        .unwrap_or(0);
    let x_max = epochs.max(2) as f64;

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for series in &panel.series {
        for &y in &series.points {
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        y_min = 0.0;
        y_max = 1.0;
    }
    if y_max - y_min < f64::EPSILON {
        // A flat series still needs a visible band around it.
        y_min -= 0.5;
        y_max += 0.5;
    }

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 16).into_font())
        .margin(10)
        .x_label_area_size(28)
        .y_label_area_size(48)
        .build_cartesian_2d(1f64..x_max, y_min..y_max)
        .map_err(draw_error)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(8)
        .y_labels(6)
        .x_desc("Epoch")
        .draw()
        .map_err(draw_error)?;

    for (series, color) in panel.series.iter().zip(SERIES_COLORS.iter().cycle()) {
        let points: Vec<(f64, f64)> = series
            .points
            .iter()
            .enumerate()
            .map(|(i, &y)| ((i + 1) as f64, y))
            .collect();

        chart
            .draw_series(LineSeries::new(points, color))
            .map_err(draw_error)?
            .label(series.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    if panel.series.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_error)?;
    }

    Ok(())
}

fn draw_error(error: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(error.to_string())
}
