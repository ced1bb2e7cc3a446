//! Renderer-facing description of the progress chart.
//!
//! The monitor reduces its recorded state to a [`Frame`] of titled line-plot
//! panels; a [`Renderer`] turns frames into some concrete output surface.
//! Keeping the two apart means the recorder can be tested without a real
//! display backend.

use thiserror::Error;

/// Errors raised by a rendering backend.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Wrapper for standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The drawing backend rejected the frame
    #[error("drawing failed: {0}")]
    Draw(String),
}

/// One line series within a panel. Points are y-values plotted against
/// their 1-based position in the series.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<f64>,
}

/// One titled panel of overlaid line series.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub series: Vec<Series>,
}

/// A full chart: titled line-plot panels drawn left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub panels: Vec<Panel>,
}

/// A surface frames can be drawn onto.
///
/// Each call replaces whatever the previous call drew, so the latest frame
/// is always the one on display.
pub trait Renderer {
    fn render(&mut self, frame: &Frame) -> Result<(), RenderError>;
}
