//! Three-row SVG chart of a simulation run.

use std::path::Path;

use chrono::NaiveDate;
use log::info;
use plotters::prelude::*;

use crate::domain::SimulationOutput;
use crate::error::AppError;
use crate::plot::panels::{SVG_STYLE, build_panels, chart_title, draw_panel, monthly_axis};

pub const DEFAULT_CHART_SIZE: (u32, u32) = (1100, 800);

/// Render the rates / inflation / output-gap chart to an SVG file.
pub fn write_chart_svg(
    path: &Path,
    output: &SimulationOutput,
    epoch: NaiveDate,
    size: (u32, u32),
) -> Result<(), AppError> {
    let chart_err = |e: &dyn std::fmt::Display| {
        AppError::runtime(format!("Failed to render chart '{}': {e}", path.display()))
    };

    let panels = build_panels(output);
    let axis = monthly_axis(epoch, output.len());

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(|e| chart_err(&e))?;
    let body = root
        .titled(&chart_title(epoch), ("sans-serif", 22).into_font().color(&BLACK))
        .map_err(|e| chart_err(&e))?;

    for (area, panel) in body.split_evenly((3, 1)).iter().zip(panels.iter()) {
        draw_panel(area, panel, &axis, &SVG_STYLE).map_err(|e| chart_err(&e))?;
    }

    root.present().map_err(|e| chart_err(&e))?;
    info!("Wrote chart to {}.", path.display());
    Ok(())
}
