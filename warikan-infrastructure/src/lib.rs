#![warn(clippy::uninlined_format_args)]

pub mod chart_renderer;
pub mod interpreter;

pub use chart_renderer::SvgChartRenderer;
pub use interpreter::StrictFormatInterpreter;
