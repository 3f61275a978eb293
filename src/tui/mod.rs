//! Ratatui-based terminal UI.
//!
//! The TUI shows the KPI tiles, the sales trend for the selected date range,
//! the monthly/weekly/daily revenue bars, the country segmentation and the
//! customer/country lookup table. A filters panel drives the date range and
//! the two lookup selectors; every change recomputes the view from memory.

use std::io;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use plotters::style::RGBColor;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
    Terminal,
};

use crate::app::pipeline::{Dashboard, DashboardView, NO_VALID_DATES};
use crate::cli::TuiArgs;
use crate::config::DataPaths;
use crate::domain::{CountrySegment, DateRange, RevenuePoint};
use crate::error::AppError;
use crate::report::{fmt_thousands, kpi_tiles, share_pct, truncate};

mod plotters_chart;

use plotters_chart::{RevenueChart, SeriesStyle};

/// Start the TUI.
pub fn run(args: TuiArgs) -> Result<(), AppError> {
    // Load before taking over the terminal so input errors print normally.
    let paths = DataPaths::from_args(&args.data);
    let dashboard = Dashboard::load(&paths)?;
    let mut app = App::new(paths, dashboard, args.data.from, args.data.to);

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Rows of the filters panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    From,
    To,
    Customer,
    Country,
}

impl Field {
    const ALL: [Field; 4] = [Field::From, Field::To, Field::Customer, Field::Country];

    fn is_date(self) -> bool {
        matches!(self, Field::From | Field::To)
    }
}

/// The three aggregate charts, top to bottom: title, series, x-axis label.
fn period_charts(view: &DashboardView) -> [(&'static str, &[RevenuePoint], &'static str); 3] {
    [
        ("Monthly Sales", &view.monthly, "InvoiceDate"),
        ("Weekly Sales", &view.weekly, "StartDate"),
        ("Daily Sales", &view.daily, "InvoiceDate"),
    ]
}

struct App {
    paths: DataPaths,
    dashboard: Dashboard,
    /// `None` is the blocking "no valid dates" state.
    view: Option<DashboardView>,
    selected_field: usize,
    editing: Option<Field>,
    input: String,
    customer_idx: usize,
    country_idx: usize,
    status: String,
}

impl App {
    fn new(paths: DataPaths, dashboard: Dashboard, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        let mut app = Self {
            paths,
            dashboard,
            view: None,
            selected_field: 0,
            editing: None,
            input: String::new(),
            customer_idx: 0,
            country_idx: 0,
            status: String::new(),
        };
        app.reset_view(from, to);
        app
    }

    /// Recompute the view for the requested range, falling back to the data bounds.
    fn reset_view(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        let range = match self.dashboard.resolve_range(from, to) {
            Ok(range) => Some(range),
            Err(err) if err.exit_code() == 3 => None,
            Err(err) => {
                warn!("{err}; using the full date range");
                self.status = format!("{err} Using the full date range.");
                self.dashboard.default_range().ok()
            }
        };

        self.view = range.map(|r| self.dashboard.view(r));
        if self.view.is_none() {
            self.status = NO_VALID_DATES.to_string();
        } else if self.status.is_empty() {
            self.status = format!("Loaded {} transactions.", self.dashboard.transactions.rows.len());
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if let Some(field) = self.editing {
            self.handle_edit(field, code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('d') => self.write_debug(),
            _ if self.view.is_none() => {}
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < Field::ALL.len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::PageUp => self.adjust_field(-10),
            KeyCode::PageDown => self.adjust_field(10),
            KeyCode::Enter => {
                let field = self.field();
                self.editing = Some(field);
                self.input.clear();
                self.status = if field.is_date() {
                    "Editing date (YYYY-MM-DD). Enter to apply, Esc to cancel.".to_string()
                } else {
                    "Type a value. Enter to apply, Esc to cancel.".to_string()
                };
            }
            _ => {}
        }

        false
    }

    fn handle_edit(&mut self, field: Field, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing = None;
                let input = std::mem::take(&mut self.input);
                self.apply_input(field, input.trim());
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => {
                if !field.is_date() || c.is_ascii_digit() || c == '-' {
                    self.input.push(c);
                }
            }
            _ => {}
        }
    }

    fn field(&self) -> Field {
        Field::ALL[self.selected_field.min(Field::ALL.len() - 1)]
    }

    fn range(&self) -> Option<DateRange> {
        self.view.as_ref().map(|v| v.range)
    }

    fn adjust_field(&mut self, delta: i64) {
        let Some(range) = self.range() else { return };
        match self.field() {
            Field::From => {
                if let Some(start) = shift_days(range.start, delta) {
                    self.set_range(start, range.end);
                }
            }
            Field::To => {
                if let Some(end) = shift_days(range.end, delta) {
                    self.set_range(range.start, end);
                }
            }
            Field::Customer => {
                let n = self.dashboard.options.customers.len();
                self.customer_idx = cycle(self.customer_idx, delta, n);
                self.status = self.lookup_status();
            }
            Field::Country => {
                let n = self.dashboard.options.countries.len();
                self.country_idx = cycle(self.country_idx, delta, n);
                self.status = self.lookup_status();
            }
        }
    }

    fn apply_input(&mut self, field: Field, input: &str) {
        if input.is_empty() {
            self.status = "Nothing entered.".to_string();
            return;
        }
        match field {
            Field::From | Field::To => {
                let Some(range) = self.range() else { return };
                let date = match NaiveDate::parse_from_str(input, "%Y-%m-%d") {
                    Ok(d) => d,
                    Err(e) => {
                        self.status = format!("Invalid date '{input}': {e}");
                        return;
                    }
                };
                if field == Field::From {
                    self.set_range(date, range.end);
                } else {
                    self.set_range(range.start, date);
                }
            }
            Field::Customer => match find_option(&self.dashboard.options.customers, input) {
                Some(idx) => {
                    self.customer_idx = idx;
                    self.status = self.lookup_status();
                }
                None => self.status = format!("No customer matching '{input}'."),
            },
            Field::Country => match find_option(&self.dashboard.options.countries, input) {
                Some(idx) => {
                    self.country_idx = idx;
                    self.status = self.lookup_status();
                }
                None => self.status = format!("No country matching '{input}'."),
            },
        }
    }

    fn set_range(&mut self, start: NaiveDate, end: NaiveDate) {
        match DateRange::new(start, end) {
            Some(range) => {
                let view = self.dashboard.view(range);
                self.status = format!("Range {start} .. {end}: {} trend point(s).", view.trend.len());
                self.view = Some(view);
            }
            None => {
                self.status = format!("Invalid range: {start} is after {end}.");
            }
        }
    }

    fn selected_customer(&self) -> Option<&str> {
        self.dashboard.options.customers.get(self.customer_idx).map(String::as_str)
    }

    fn selected_country(&self) -> Option<&str> {
        self.dashboard.options.countries.get(self.country_idx).map(String::as_str)
    }

    fn lookup_status(&self) -> String {
        match (self.selected_customer(), self.selected_country()) {
            (Some(customer), Some(country)) => {
                let n = self.dashboard.lookup(customer, country).len();
                format!("Customer {customer} in {country}: {n} row(s).")
            }
            _ => "No customers/countries loaded.".to_string(),
        }
    }

    fn reload(&mut self) {
        let requested = self.range();
        match Dashboard::load(&self.paths) {
            Ok(dashboard) => {
                info!("Reloaded extracts from disk");
                self.dashboard = dashboard;
                self.customer_idx = self.customer_idx.min(self.dashboard.options.customers.len().saturating_sub(1));
                self.country_idx = self.country_idx.min(self.dashboard.options.countries.len().saturating_sub(1));
                self.status.clear();
                self.reset_view(requested.map(|r| r.start), requested.map(|r| r.end));
                if self.view.is_some() {
                    self.status = format!("Reloaded {} transactions.", self.dashboard.transactions.rows.len());
                }
            }
            Err(err) => {
                warn!("Reload failed: {err}");
                self.status = format!("Reload failed: {err}");
            }
        }
    }

    fn write_debug(&mut self) {
        match crate::debug::write_debug_bundle(&self.dashboard, self.view.as_ref()) {
            Ok(path) => {
                self.status = format!("Wrote debug bundle: {}", path.display());
            }
            Err(err) => {
                self.status = format!("Debug write failed: {err}");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        match &self.view {
            Some(view) => {
                draw_kpis(frame, chunks[1], view);
                self.draw_body(frame, chunks[2], view);
            }
            None => {
                let area = Rect {
                    height: chunks[1].height + chunks[2].height,
                    ..chunks[1]
                };
                draw_blocking_error(frame, area);
            }
        }
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let range = self
            .range()
            .map(|r| format!("{} .. {}", r.start, r.end))
            .unwrap_or_else(|| "-".to_string());
        let line = Line::from(vec![
            Span::styled("E-commerce Dashboard", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!(
                    " | range: {range} | data: {}",
                    self.paths.transactions.parent().map(|p| p.display().to_string()).unwrap_or_default()
                ),
                Style::default().fg(Color::Gray),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect, view: &DashboardView) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);

        let charts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(20),
                Constraint::Percentage(20),
                Constraint::Percentage(20),
            ])
            .split(columns[0]);

        draw_revenue_chart(
            frame,
            charts[0],
            "Sales Trend Over Time",
            &view.trend,
            ChartKind::Line,
            "InvoiceDate",
        );

        for ((title, points, x_label), area) in period_charts(view).into_iter().zip(charts.iter().skip(1)) {
            draw_revenue_chart(frame, *area, title, points, ChartKind::Bars, x_label);
        }

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Percentage(50), Constraint::Min(0)])
            .split(columns[1]);

        self.draw_filters(frame, side[0]);
        draw_segments(frame, side[1], &view.segments);
        self.draw_lookup(frame, side[2]);
    }

    fn draw_filters(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let range = self.range();
        let value = |field: Field| -> String {
            if self.editing == Some(field) {
                return format!("{}_", self.input);
            }
            match field {
                Field::From => range.map(|r| r.start.to_string()).unwrap_or_default(),
                Field::To => range.map(|r| r.end.to_string()).unwrap_or_default(),
                Field::Customer => format!(
                    "{} ({}/{})",
                    self.selected_customer().unwrap_or("-"),
                    self.customer_idx + 1,
                    self.dashboard.options.customers.len()
                ),
                Field::Country => format!(
                    "{} ({}/{})",
                    self.selected_country().unwrap_or("-"),
                    self.country_idx + 1,
                    self.dashboard.options.countries.len()
                ),
            }
        };

        let items: Vec<ListItem> = vec![
            ListItem::new(format!("From:     {}", value(Field::From))),
            ListItem::new(format!("To:       {}", value(Field::To))),
            ListItem::new(format!("Customer: {}", value(Field::Customer))),
            ListItem::new(format!("Country:  {}", value(Field::Country))),
        ];

        let list = List::new(items)
            .block(Block::default().title("Filters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_lookup(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let (Some(customer), Some(country)) = (self.selected_customer(), self.selected_country()) else {
            let p = Paragraph::new("No customers/countries loaded.")
                .block(Block::default().title("Filter by Customer and Country").borders(Borders::ALL));
            frame.render_widget(p, area);
            return;
        };

        let rows = self.dashboard.lookup(customer, country);
        let block = Block::default()
            .title(format!("Filter by Customer and Country ({} rows)", rows.len()))
            .borders(Borders::ALL);

        if rows.is_empty() {
            let p = Paragraph::new(format!("No rows for customer {customer} in {country}."))
                .style(Style::default().fg(Color::Yellow))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(p, area);
            return;
        }

        let header = Row::new(vec!["InvoiceDate", "InvoiceNo", "Price", "CustomerID", "Country"])
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
        let body: Vec<Row> = rows
            .iter()
            .map(|t| {
                Row::new(vec![
                    Cell::from(t.invoice_date.to_string()),
                    Cell::from(t.invoice_no.clone()),
                    Cell::from(fmt_thousands(t.price, 2)),
                    Cell::from(t.customer_id.clone().unwrap_or_default()),
                    Cell::from(t.country.clone()),
                ])
            })
            .collect();
        let widths = [
            Constraint::Length(10),
            Constraint::Length(9),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Min(8),
        ];
        let table = Table::new(body, widths).header(header).block(block);
        frame.render_widget(table, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  PgUp/PgDn jump  Enter edit  r reload  d debug  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_kpis(frame: &mut ratatui::Frame<'_>, area: Rect, view: &DashboardView) {
    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((label, value), rect) in kpi_tiles(&view.kpis).into_iter().zip(tiles.iter()) {
        let p = Paragraph::new(Span::styled(
            value,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().title(label).borders(Borders::ALL));
        frame.render_widget(p, *rect);
    }
}

fn draw_blocking_error(frame: &mut ratatui::Frame<'_>, area: Rect) {
    let p = Paragraph::new(Text::from(vec![
        Line::from(Span::styled(
            NO_VALID_DATES,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Check the InvoiceDate column (expected month/day/year), then press r to reload.",
            Style::default().fg(Color::Gray),
        )),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().title("Error").borders(Borders::ALL));
    frame.render_widget(p, area);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChartKind {
    Line,
    Bars,
}

fn draw_revenue_chart(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    points: &[RevenuePoint],
    kind: ChartKind,
    x_label: &str,
) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    let Some(series) = chart_series(points, kind) else {
        let msg = Paragraph::new("No data for this selection.").style(Style::default().fg(Color::Yellow));
        frame.render_widget(msg, inner);
        return;
    };

    let (style, color) = match kind {
        ChartKind::Line => (SeriesStyle::Line, RGBColor(0, 255, 255)),
        ChartKind::Bars => (
            SeriesStyle::Bars {
                half_width: series.half_width,
            },
            RGBColor(100, 149, 237),
        ),
    };

    let widget = RevenueChart {
        points: &series.points,
        style,
        color,
        x_bounds: series.x_bounds,
        y_bounds: series.y_bounds,
        x_label,
        y_label: "revenue",
        fmt_x: fmt_axis_date,
        fmt_y: fmt_axis_compact,
    };
    frame.render_widget(widget, inner);
}

/// Chart-ready series: x is a day number, y is revenue.
#[derive(Debug, Clone, PartialEq)]
struct ChartSeries {
    points: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    half_width: f64,
}

/// Build chart series for Plotters. `None` when there is nothing to draw.
fn chart_series(points: &[RevenuePoint], kind: ChartKind) -> Option<ChartSeries> {
    if points.is_empty() {
        return None;
    }
    let xy: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (p.date.num_days_from_ce() as f64, p.revenue))
        .collect();

    // Bars take 80% of the smallest gap between neighbours.
    let min_gap = xy
        .windows(2)
        .map(|w| w[1].0 - w[0].0)
        .filter(|g| *g > 0.0)
        .fold(f64::INFINITY, f64::min);
    let half_width = if min_gap.is_finite() { min_gap * 0.4 } else { 0.4 };

    let x_min = xy.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let x_max = xy.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let x_pad = match kind {
        ChartKind::Bars => half_width * 1.5,
        ChartKind::Line => 0.5,
    };
    let x_bounds = [x_min - x_pad, x_max + x_pad];

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in &xy {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if kind == ChartKind::Bars {
        y_min = y_min.min(0.0);
        y_max = y_max.max(0.0);
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        return None;
    }
    if y_max <= y_min {
        y_min -= 1.0;
        y_max += 1.0;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    let y_bounds = [y_min - pad, y_max + pad];

    Some(ChartSeries {
        points: xy,
        x_bounds,
        y_bounds,
        half_width,
    })
}

fn draw_segments(frame: &mut ratatui::Frame<'_>, area: Rect, segments: &[CountrySegment]) {
    let block = Block::default()
        .title("Customer Segments by Country (Top 12 + Others)")
        .borders(Borders::ALL);
    let inner_width = block.inner(area).width as usize;

    // "■ " + 14-char label + " " + 6-char count + " " + 6-char percent + " "
    let bar_room = inner_width.saturating_sub(32);

    let items: Vec<ListItem> = segments
        .iter()
        .zip(segment_shares(segments, bar_room))
        .enumerate()
        .map(|(i, (s, (pct, bar_len)))| {
            let color = SEGMENT_PALETTE[i % SEGMENT_PALETTE.len()];
            ListItem::new(Line::from(vec![
                Span::styled("■ ", Style::default().fg(color)),
                Span::raw(format!("{:<14} {:>6} {:>5.1}% ", truncate(&s.country, 14), s.customers, pct)),
                Span::styled("█".repeat(bar_len), Style::default().fg(color)),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// Percentage of all customers and bar length per segment; the largest
/// segment fills `bar_room`.
fn segment_shares(segments: &[CountrySegment], bar_room: usize) -> Vec<(f64, usize)> {
    let total: usize = segments.iter().map(|s| s.customers).sum();
    let max_share = segments
        .iter()
        .map(|s| share_pct(s.customers, total))
        .fold(0.0, f64::max);

    segments
        .iter()
        .map(|s| {
            let pct = share_pct(s.customers, total);
            let bar_len = if max_share > 0.0 {
                ((pct / max_share) * bar_room as f64).round() as usize
            } else {
                0
            };
            (pct, bar_len)
        })
        .collect()
}

const SEGMENT_PALETTE: [Color; 13] = [
    Color::Cyan,
    Color::LightBlue,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
    Color::Red,
    Color::LightCyan,
    Color::LightGreen,
    Color::LightYellow,
    Color::LightMagenta,
    Color::LightRed,
    Color::Blue,
    Color::Gray,
];

fn shift_days(date: NaiveDate, delta: i64) -> Option<NaiveDate> {
    date.checked_add_signed(chrono::Duration::days(delta))
}

/// Step an index by `delta` with wrap-around; `0` when `len == 0`.
fn cycle(idx: usize, delta: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i64;
    ((idx as i64 + delta).rem_euclid(len)) as usize
}

/// Exact (case-insensitive) match first, then the first prefix match.
fn find_option(options: &[String], input: &str) -> Option<usize> {
    options
        .iter()
        .position(|o| o.eq_ignore_ascii_case(input))
        .or_else(|| {
            let needle = input.to_ascii_lowercase();
            options
                .iter()
                .position(|o| o.to_ascii_lowercase().starts_with(&needle))
        })
}

fn fmt_axis_date(v: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(v.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Short axis labels: `950`, `12.5k`, `1.2M`.
fn fmt_axis_compact(v: f64) -> String {
    let a = v.abs();
    if a >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if a >= 1e3 {
        format!("{:.1}k", v / 1e3)
    } else {
        format!("{v:.0}")
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::domain::Granularity;
    use crate::io::ingest::{read_aggregates, read_transactions};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn app_with(final_csv: &str) -> App {
        let tx = read_transactions(final_csv.as_bytes(), "final").unwrap();
        let monthly = read_aggregates(
            "InvoiceDate,TotalRevenue\n2020-01,30\n".as_bytes(),
            Granularity::Monthly,
            "monthly",
        )
        .unwrap();
        let weekly = read_aggregates("InvoiceDate,TotalRevenue\n".as_bytes(), Granularity::Weekly, "weekly").unwrap();
        let daily = read_aggregates("InvoiceDate,TotalRevenue\n".as_bytes(), Granularity::Daily, "daily").unwrap();
        let dashboard = Dashboard::from_parts(tx, monthly, weekly, daily);
        App::new(DataPaths::in_dir(Path::new("unused")), dashboard, None, None)
    }

    fn app() -> App {
        app_with(
            "InvoiceDate,Price,InvoiceNo,CustomerID,Country\n\
             1/1/2020,10,A,1,US\n\
             1/2/2020,20,B,2,US\n\
             1/3/2020,5,C,3,France\n",
        )
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn starts_on_full_range() {
        let app = app();
        assert_eq!(app.range(), DateRange::new(d(2020, 1, 1), d(2020, 1, 3)));
        assert_eq!(app.view.as_ref().unwrap().trend.len(), 3);
    }

    #[test]
    fn editing_from_date_narrows_trend() {
        let mut app = app();
        app.handle_key(KeyCode::Enter);
        type_str(&mut app, "2020-01-02");
        app.handle_key(KeyCode::Enter);

        let view = app.view.as_ref().unwrap();
        assert_eq!(view.range.start, d(2020, 1, 2));
        assert_eq!(view.trend.len(), 2);
        // KPIs still cover every transaction.
        assert_eq!(view.kpis.total_sales, 35.0);
    }

    #[test]
    fn inverted_range_keeps_previous_view() {
        let mut app = app();
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);
        type_str(&mut app, "2019-12-01");
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.range().unwrap().end, d(2020, 1, 3));
        assert!(app.status.starts_with("Invalid range"));
    }

    #[test]
    fn arrows_shift_dates_by_one_day() {
        let mut app = app();
        app.handle_key(KeyCode::Right);
        assert_eq!(app.range().unwrap().start, d(2020, 1, 2));
        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.range().unwrap().start, d(2019, 12, 31));
    }

    #[test]
    fn selectors_cycle_independently() {
        let mut app = app();
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.selected_customer(), Some("3"));
        assert_eq!(app.selected_country(), Some("US"));

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.selected_country(), Some("France"));
        assert_eq!(app.dashboard.lookup("3", "France").len(), 1);
    }

    #[test]
    fn typed_customer_jumps_to_match() {
        let mut app = app();
        app.selected_field = 2;
        app.handle_key(KeyCode::Enter);
        type_str(&mut app, "2");
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.selected_customer(), Some("2"));
        assert!(app.status.contains("1 row(s)"));
    }

    #[test]
    fn no_valid_dates_blocks_controls() {
        let mut app = app_with("InvoiceDate,Price,InvoiceNo,CustomerID,Country\n2020-01-01,10,A,1,US\n");
        assert!(app.view.is_none());
        assert_eq!(app.status, NO_VALID_DATES);
        assert!(!app.handle_key(KeyCode::Right));
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn all_three_period_charts_are_laid_out() {
        let app = app();
        let view = app.view.as_ref().unwrap();
        let charts = period_charts(view);
        let titles: Vec<&str> = charts.iter().map(|c| c.0).collect();
        assert_eq!(titles, vec!["Monthly Sales", "Weekly Sales", "Daily Sales"]);
        assert_eq!(charts[0].1.len(), 1);
        assert_eq!(charts[1].2, "StartDate");
        assert!(charts[2].1.is_empty());
    }

    #[test]
    fn segment_shares_scale_to_the_largest() {
        let segs = vec![
            CountrySegment { country: "United Kingdom".to_string(), customers: 30 },
            CountrySegment { country: "Others".to_string(), customers: 10 },
        ];
        let shares = segment_shares(&segs, 20);
        assert_eq!(shares[0], (75.0, 20));
        assert_eq!(shares[1], (25.0, 7));

        let empty = vec![CountrySegment { country: "US".to_string(), customers: 0 }];
        assert_eq!(segment_shares(&empty, 20), vec![(0.0, 0)]);
    }

    #[test]
    fn chart_series_bounds() {
        let pts = vec![
            RevenuePoint { date: d(2020, 1, 1), revenue: 10.0 },
            RevenuePoint { date: d(2020, 1, 3), revenue: 30.0 },
        ];
        let s = chart_series(&pts, ChartKind::Bars).unwrap();
        assert!((s.half_width - 0.8).abs() < 1e-12);
        assert!(s.y_bounds[0] < 0.0 && s.y_bounds[1] > 30.0);
        assert!(s.x_bounds[0] < s.points[0].0 && s.x_bounds[1] > s.points[1].0);

        let single = chart_series(&pts[..1], ChartKind::Line).unwrap();
        assert!(single.y_bounds[1] > single.y_bounds[0]);
        assert!(chart_series(&[], ChartKind::Line).is_none());
    }

    #[test]
    fn helpers() {
        assert_eq!(cycle(0, -1, 3), 2);
        assert_eq!(cycle(2, 10, 3), 0);
        assert_eq!(cycle(0, 1, 0), 0);

        let opts = vec!["United Kingdom".to_string(), "France".to_string()];
        assert_eq!(find_option(&opts, "france"), Some(1));
        assert_eq!(find_option(&opts, "united"), Some(0));
        assert_eq!(find_option(&opts, "Spain"), None);

        assert_eq!(fmt_axis_compact(1_240_000.0), "1.2M");
        assert_eq!(fmt_axis_compact(12_500.0), "12.5k");
        assert_eq!(fmt_axis_compact(950.0), "950");
        assert_eq!(fmt_axis_date(d(2010, 12, 1).num_days_from_ce() as f64), "2010-12-01");
    }
}
