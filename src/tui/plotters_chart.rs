//! Plotters-powered revenue chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - filled bars come for free via `Rectangle`
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color as TuiColor, Style},
    widgets::Widget,
};

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesStyle {
    /// Connected line (the sales trend).
    Line,
    /// One filled bar per point, `half_width` x-units either side of it.
    Bars { half_width: f64 },
}

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call, so `render()`
/// only draws.
pub struct RevenueChart<'a> {
    /// `(day number, revenue)` points, ascending by x.
    pub points: &'a [(f64, f64)],
    pub style: SeriesStyle,
    pub color: RGBColor,
    /// X bounds (days since the common era).
    pub x_bounds: [f64; 2],
    /// Y bounds (currency units).
    pub y_bounds: [f64; 2],
    /// Axis labels (kept simple for terminal rendering).
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Formatting of tick labels.
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for RevenueChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area; show a hint instead.
        if area.width < 20 || area.height < 6 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(TuiColor::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(4)
                .y_labels(4)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            match self.style {
                SeriesStyle::Line => {
                    chart.draw_series(LineSeries::new(self.points.iter().copied(), &self.color))?;
                }
                SeriesStyle::Bars { half_width } => {
                    // Bars grow from zero, or from the bottom edge when zero is off-screen.
                    let base = 0.0_f64.clamp(y0, y1);
                    chart.draw_series(self.points.iter().map(|&(x, y)| {
                        Rectangle::new([(x - half_width, base), (x + half_width, y)], self.color.filled())
                    }))?;
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(points: &[(f64, f64)], style: SeriesStyle) -> RevenueChart<'_> {
        RevenueChart {
            points,
            style,
            color: RGBColor(100, 149, 237),
            x_bounds: [-1.0, 3.0],
            y_bounds: [-1.0, 35.0],
            x_label: "InvoiceDate",
            y_label: "revenue",
            fmt_x: |v| format!("{v:.0}"),
            fmt_y: |v| format!("{v:.0}"),
        }
    }

    fn blank(buf: &Buffer) -> bool {
        buf.content().iter().all(|c| c.symbol() == " ")
    }

    #[test]
    fn filled_bars_draw_into_the_buffer() {
        let points = [(0.0, 10.0), (1.0, 30.0), (2.0, 20.0)];
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        chart(&points, SeriesStyle::Bars { half_width: 0.4 }).render(area, &mut buf);
        assert!(!blank(&buf));
    }

    #[test]
    fn tiny_area_shows_a_hint() {
        let points = [(0.0, 10.0)];
        let area = Rect::new(0, 0, 50, 3);
        let mut buf = Buffer::empty(area);
        chart(&points, SeriesStyle::Line).render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "C");
    }
}
