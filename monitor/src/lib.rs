mod monitor;
mod render;
mod svg;

pub use crate::monitor::{Monitor, MonitorError};
pub use crate::render::{Frame, Panel, RenderError, Renderer, Series};
pub use crate::svg::SvgRenderer;

pub mod prelude {
    pub use crate::Monitor;
    pub use crate::Renderer;
    pub use crate::SvgRenderer;
}
