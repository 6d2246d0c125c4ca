//! Chart panel descriptions shared by every renderer.
//!
//! The three panels are data-only: bounds, captions and line points are
//! computed once here, and the SVG, dashboard and ASCII renderers only draw.

use chrono::{Datelike, Months, NaiveDate};
use plotters::prelude::*;
use plotters::coord::Shift;

use crate::domain::SimulationOutput;

pub const SIMULATED_COLOR: RGBColor = RGBColor(31, 119, 180);
pub const POLICY_RATE_COLOR: RGBColor = RGBColor(255, 127, 14);
pub const INFLATION_COLOR: RGBColor = RGBColor(44, 160, 44);
pub const OUTPUT_GAP_COLOR: RGBColor = RGBColor(214, 39, 40);

/// One line within a panel.
#[derive(Debug, Clone)]
pub struct PanelLine {
    pub label: String,
    pub color: RGBColor,
    /// Glyph used by the ASCII renderer.
    pub glyph: char,
    /// `(position, value)` pairs; non-finite values are dropped.
    pub points: Vec<(f64, f64)>,
}

/// One chart row.
#[derive(Debug, Clone)]
pub struct ChartPanel {
    pub caption: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub lines: Vec<PanelLine>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

/// Synthetic month-end dates, one per position, starting in the epoch's month.
pub fn monthly_axis(epoch: NaiveDate, len: usize) -> Vec<NaiveDate> {
    let first = epoch.with_day(1).unwrap_or(epoch);
    (1..=len as u32)
        .filter_map(|i| first.checked_add_months(Months::new(i)).and_then(|d| d.pred_opt()))
        .collect()
}

/// `YYYY-MM` label for a (fractional) axis position.
pub fn month_label(axis: &[NaiveDate], position: f64) -> String {
    if !position.is_finite() || position < 0.0 {
        return String::new();
    }
    axis.get(position.round() as usize)
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_default()
}

pub fn chart_title(epoch: NaiveDate) -> String {
    format!("ECB Interest Rate Simulation (Since {})", epoch.year())
}

/// Build the three panels: rates, inflation, output gap.
///
/// Panels whose inputs fell back to defaults say so in their caption.
pub fn build_panels(output: &SimulationOutput) -> [ChartPanel; 3] {
    let provenance = &output.provenance;
    let x_max = (output.len().max(2) - 1) as f64;

    let rates_defaulted = provenance.inflation.is_defaulted()
        || provenance.output_gap_defaulted()
        || provenance.policy_rate.is_defaulted();

    let rates = panel(
        with_default_flag("Simulated Interest Rate vs ECB Rate", rates_defaulted),
        "",
        "Interest Rate (%)",
        vec![
            line("Simulated Interest Rate", SIMULATED_COLOR, '*', output.rates.values()),
            line("ECB Official Rate", POLICY_RATE_COLOR, '.', output.policy_rate.values()),
        ],
        x_max,
    );
    let inflation = panel(
        with_default_flag("Inflation", provenance.inflation.is_defaulted()),
        "",
        "Inflation (%)",
        vec![line("Inflation", INFLATION_COLOR, '*', output.inflation.values())],
        x_max,
    );
    let gap = panel(
        with_default_flag("Output Gap", provenance.output_gap_defaulted()),
        "Time",
        "Output Gap (%)",
        vec![line("Output Gap", OUTPUT_GAP_COLOR, '*', output.output_gap.values())],
        x_max,
    );

    [rates, inflation, gap]
}

fn with_default_flag(caption: &str, defaulted: bool) -> String {
    if defaulted {
        format!("{caption} (default)")
    } else {
        caption.to_string()
    }
}

fn line(label: &str, color: RGBColor, glyph: char, values: &[f64]) -> PanelLine {
    let points = values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| (i as f64, v))
        .collect();
    PanelLine {
        label: label.to_string(),
        color,
        glyph,
        points,
    }
}

fn panel(
    caption: String,
    x_label: &'static str,
    y_label: &'static str,
    lines: Vec<PanelLine>,
    x_max: f64,
) -> ChartPanel {
    let (lo, hi) = lines
        .iter()
        .flat_map(|l| l.points.iter().map(|&(_, y)| y))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| (lo.min(y), hi.max(y)));
    let (lo, hi) = if lo.is_finite() && hi.is_finite() { (lo, hi) } else { (0.0, 1.0) };
    let (lo, hi) = pad_range(lo, hi, 0.05);

    ChartPanel {
        caption,
        x_label,
        y_label,
        lines,
        x_bounds: [0.0, x_max],
        y_bounds: [lo, hi],
    }
}

/// Widen `[min, max]` by `frac` of its span; flat ranges get a unit pad so
/// constant (e.g. defaulted) series still have a drawable axis.
pub fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    if span < 1e-9 {
        let pad = (min.abs() * frac).max(1.0);
        return (min - pad, max + pad);
    }
    let pad = span * frac;
    (min - pad, max + pad)
}

/// Renderer-specific styling knobs.
#[derive(Debug, Clone, Copy)]
pub struct PanelStyle {
    pub foreground: RGBColor,
    pub caption_size: u32,
    pub label_size: u32,
    pub margin: u32,
    pub x_label_area: u32,
    pub y_label_area: u32,
    pub stroke_width: u32,
    pub mesh: bool,
    pub legend: bool,
}

pub const SVG_STYLE: PanelStyle = PanelStyle {
    foreground: BLACK,
    caption_size: 18,
    label_size: 13,
    margin: 12,
    x_label_area: 40,
    y_label_area: 60,
    stroke_width: 2,
    mesh: true,
    legend: true,
};

// Terminal cells are low-res, so keep label areas compact and skip the mesh.
pub const TERMINAL_STYLE: PanelStyle = PanelStyle {
    foreground: WHITE,
    caption_size: 0,
    label_size: 10,
    margin: 1,
    x_label_area: 3,
    y_label_area: 6,
    stroke_width: 1,
    mesh: false,
    legend: false,
};

/// Draw one panel onto any Plotters drawing area.
pub fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &ChartPanel,
    axis: &[NaiveDate],
    style: &PanelStyle,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let [x0, x1] = panel.x_bounds;
    let [y0, y1] = panel.y_bounds;
    let foreground = style.foreground;

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(style.margin)
        .set_label_area_size(LabelAreaPosition::Left, style.y_label_area)
        .set_label_area_size(LabelAreaPosition::Bottom, style.x_label_area);
    if style.caption_size > 0 {
        builder.caption(
            panel.caption.as_str(),
            ("sans-serif", style.caption_size).into_font().color(&foreground),
        );
    }
    let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;

    let fmt_x = |v: &f64| month_label(axis, *v);
    let fmt_y = |v: &f64| format!("{v:.1}");

    let mut mesh = chart.configure_mesh();
    if !style.mesh {
        mesh.disable_x_mesh().disable_y_mesh();
    }
    mesh.x_desc(panel.x_label)
        .y_desc(panel.y_label)
        .x_labels(6)
        .y_labels(5)
        .x_label_formatter(&fmt_x)
        .y_label_formatter(&fmt_y)
        .label_style(("sans-serif", style.label_size).into_font().color(&foreground))
        .axis_style(&foreground)
        .draw()?;

    for line in &panel.lines {
        let color = line.color;
        let drawn = chart.draw_series(LineSeries::new(
            line.points.iter().copied(),
            color.stroke_width(style.stroke_width),
        ))?;
        if style.legend {
            drawn
                .label(line.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], &color));
        }
    }

    if style.legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&foreground)
            .label_font(("sans-serif", style.label_size).into_font().color(&foreground))
            .draw()?;
    }

    Ok(())
}
