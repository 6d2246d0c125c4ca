//! Chart rendering.
//!
//! - panel data + the shared Plotters drawing routine (`panels`)
//! - SVG file output (`svg`)
//! - terminal ASCII output (`ascii`)

pub mod ascii;
pub mod panels;
pub mod svg;

pub use ascii::render_ascii_chart;
pub use panels::{ChartPanel, build_panels, monthly_axis};
pub use svg::{DEFAULT_CHART_SIZE, write_chart_svg};
