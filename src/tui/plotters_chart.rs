//! Plotters-powered panel widget for Ratatui.
//!
//! The same `draw_panel` routine that produces the SVG chart renders into the
//! Ratatui buffer through `plotters-ratatui-backend`.

use chrono::NaiveDate;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::plot::panels::{ChartPanel, TERMINAL_STYLE, draw_panel};

/// A render-only view of one chart panel.
pub struct PanelChart<'a> {
    pub panel: &'a ChartPanel,
    pub axis: &'a [NaiveDate],
}

impl<'a> Widget for PanelChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 6 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.panel.x_bounds;
        let [y0, y1] = self.panel.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let panel = self.panel;
        let axis = self.axis;
        let widget = widget_fn(move |root| {
            draw_panel(&root, panel, axis, &TERMINAL_STYLE)?;
            Ok(())
        });

        widget.render(area, buf);
    }
}
