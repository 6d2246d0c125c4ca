//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid per panel), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each panel draws its lines with the panel line's glyph; earlier lines win
//! where two lines share a cell.

use chrono::NaiveDate;

use crate::domain::SimulationOutput;
use crate::plot::panels::{ChartPanel, build_panels, chart_title, month_label, monthly_axis};

/// Render all three panels stacked vertically.
pub fn render_ascii_chart(output: &SimulationOutput, epoch: NaiveDate, width: usize, height: usize) -> String {
    let axis = monthly_axis(epoch, output.len());
    let mut out = String::new();
    out.push_str(&chart_title(epoch));
    out.push('\n');
    for panel in build_panels(output).iter() {
        out.push_str(&render_panel(panel, &axis, width, height));
    }
    out
}

/// Render a single panel.
pub fn render_panel(panel: &ChartPanel, axis: &[NaiveDate], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(3);
    let [x_min, x_max] = panel.x_bounds;
    let [y_min, y_max] = panel.y_bounds;

    let mut grid = vec![vec![' '; width]; height];
    for line in &panel.lines {
        draw_polyline(&mut grid, &line.points, line.glyph, [x_min, x_max], [y_min, y_max]);
    }

    let legend: Vec<String> = panel
        .lines
        .iter()
        .map(|l| format!("{} {}", l.glyph, l.label))
        .collect();

    let mut out = String::new();
    out.push_str(&format!(
        "{} | {} | y=[{y_min:.2}, {y_max:.2}]\n",
        panel.caption,
        legend.join(", ")
    ));
    for row in grid {
        out.push('|');
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str(&format!(
        "{} .. {}\n",
        month_label(axis, x_min),
        month_label(axis, x_max)
    ));
    out
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let span = x_max - x_min;
    let u = if span > 0.0 { ((x - x_min) / span).clamp(0.0, 1.0) } else { 0.0 };
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let span = y_max - y_min;
    let u = if span > 0.0 { ((y - y_min) / span).clamp(0.0, 1.0) } else { 0.5 };
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(grid: &mut [Vec<char>], points: &[(f64, f64)], glyph: char, xs: [f64; 2], ys: [f64; 2]) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in points {
        let cx = map_x(x, xs[0], xs[1], width);
        let cy = map_y(y, ys[0], ys[1], height);
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, cx, cy, glyph),
            None => {
                if grid[cy][cx] == ' ' {
                    grid[cy][cx] = glyph;
                }
            }
        }
        prev = Some((cx, cy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
