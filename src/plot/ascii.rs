//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal or a piped report
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - line charts: `*` at each point, joined by `-`
//! - bar charts: `#` columns from the baseline

use chrono::{Datelike, NaiveDate};

use crate::domain::RevenuePoint;

/// Render a revenue-over-time line chart.
pub fn render_line_chart(title: &str, points: &[RevenuePoint], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some((x_min, x_max)) = x_range(points) else {
        return format!("{title}: (no data)\n");
    };
    let (y_min, y_max) = y_range(points).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let mut prev = None;
    for p in points {
        let x = map_x(day_number(p.date), x_min, x_max, width);
        let y = map_y(p.revenue, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(&mut grid, x0, y0, x, y, '-');
        }
        prev = Some((x, y));
    }
    // Markers go on top of the connecting segments.
    for p in points {
        let x = map_x(day_number(p.date), x_min, x_max, width);
        let y = map_y(p.revenue, y_min, y_max, height);
        grid[y][x] = '*';
    }

    finish(title, points, y_min, y_max, grid)
}

/// Render a bar chart with one column per point (in input order).
///
/// When there are more points than columns, neighbouring points share a
/// column and the tallest one wins.
pub fn render_bar_chart(title: &str, points: &[RevenuePoint], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    if points.is_empty() {
        return format!("{title}: (no data)\n");
    }
    let (y_min, y_max) = y_range(points).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = (y_min.min(0.0), y_max.max(0.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let n = points.len();
    let mut columns = vec![None::<f64>; width.min(n)];
    let n_cols = columns.len();
    for (i, p) in points.iter().enumerate() {
        let col = i * n_cols / n;
        let slot = &mut columns[col];
        *slot = Some(slot.map_or(p.revenue, |v| v.max(p.revenue)));
    }

    let mut grid = vec![vec![' '; width]; height];
    let base = map_y(0.0, y_min, y_max, height);
    for (col, value) in columns.iter().enumerate() {
        let Some(v) = value else { continue };
        let top = map_y(*v, y_min, y_max, height);
        let (lo, hi) = if top <= base { (top, base) } else { (base, top) };
        for row in grid.iter_mut().take(hi + 1).skip(lo) {
            row[col] = '#';
        }
    }

    finish(title, points, y_min, y_max, grid)
}

fn finish(title: &str, points: &[RevenuePoint], y_min: f64, y_max: f64, grid: Vec<Vec<char>>) -> String {
    let first = points.first().map(|p| p.date.to_string()).unwrap_or_default();
    let last = points.last().map(|p| p.date.to_string()).unwrap_or_default();

    let mut out = String::new();
    out.push_str(&format!(
        "{title}: date=[{first}, {last}] | revenue=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out
}

fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn x_range(points: &[RevenuePoint]) -> Option<(f64, f64)> {
    let min = points.iter().map(|p| p.date).min()?;
    let max = points.iter().map(|p| p.date).max()?;
    let (a, b) = (day_number(min), day_number(max));
    // A single day still needs a non-empty span.
    if b > a { Some((a, b)) } else { Some((a - 0.5, a + 0.5)) }
}

fn y_range(points: &[RevenuePoint]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in points {
        min_y = min_y.min(p.revenue);
        max_y = max_y.max(p.revenue);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() {
        Some((min_y - 1.0, max_y + 1.0))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
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

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(y: i32, m: u32, d: u32, revenue: f64) -> RevenuePoint {
        RevenuePoint {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            revenue,
        }
    }

    #[test]
    fn line_chart_golden_snapshot_small() {
        let points = vec![pt(2020, 1, 1, 0.0), pt(2020, 1, 10, 10.0)];
        let txt = render_line_chart("Sales", &points, 10, 5);
        let expected = concat!(
            "Sales: date=[2020-01-01, 2020-01-10] | revenue=[-0.50, 10.50]\n",
            "        -*\n",
            "      --\n",
            "    --\n",
            "  --\n",
            "*-\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn bar_chart_golden_snapshot_small() {
        let points = vec![pt(2010, 12, 1, 10.0), pt(2011, 1, 1, 5.0)];
        let txt = render_bar_chart("Monthly", &points, 10, 5);
        let expected = concat!(
            "Monthly: date=[2010-12-01, 2011-01-01] | revenue=[-0.50, 10.50]\n",
            "#\n",
            "#\n",
            "##\n",
            "##\n",
            "##\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_series_renders_placeholder() {
        assert_eq!(render_bar_chart("Daily", &[], 10, 5), "Daily: (no data)\n");
        assert_eq!(render_line_chart("Trend", &[], 10, 5), "Trend: (no data)\n");
    }
}
