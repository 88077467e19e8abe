//! Dashboard rendering.
//!
//! Draws the processes chart, the two gauges, the latency and slow-request
//! panels, the pool info table and the help line from one published
//! [`Dashboard`]. Before the first successful poll every widget shows the
//! localized loading placeholder. While fetches fail, the help line carries
//! the failure count and the last error.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, Gauge, GraphType, Paragraph, Row, Table},
    Frame,
};

use super::layout::{DashboardLayout, MIN_HEIGHT, MIN_WIDTH};
use super::theme::Theme;
use crate::data::duration::{format_latency_ms, format_uptime};
use crate::locale::Locale;
use crate::scheduler::{Dashboard, PollHealth};

/// Everything about the display that does not change between ticks.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub locale: &'static Locale,
    pub theme: Theme,
    /// Where the data comes from, shown in the help line.
    pub source: String,
}

impl DashboardView {
    pub fn new(locale: &'static Locale, theme: Theme, source: impl Into<String>) -> Self {
        Self {
            locale,
            theme,
            source: source.into(),
        }
    }

    fn block(&self, title: &str) -> Block<'static> {
        Block::default()
            .title(Span::styled(format!(" {} ", title), self.theme.title()))
            .borders(Borders::ALL)
            .border_type(self.theme.border_type)
            .border_style(Style::default().fg(self.theme.border))
    }
}

/// Render the whole dashboard into the frame.
pub fn render(
    frame: &mut Frame,
    layout: &DashboardLayout,
    view: &DashboardView,
    dashboard: Option<&Dashboard>,
    health: &PollHealth,
) {
    if !layout.fits() {
        render_too_small(frame, layout.area);
        return;
    }

    render_chart(frame, layout.chart, view, dashboard);
    render_pool_gauge(frame, layout.pool_gauge, view, dashboard);
    render_rps_gauge(frame, layout.rps_gauge, view, dashboard);
    render_avg_duration(frame, layout.avg_duration, view, dashboard);
    render_slow_requests(frame, layout.slow_requests, view, dashboard);
    render_info(frame, layout.info, view, dashboard);
    render_help(frame, layout.help, view, health);
}

fn render_too_small(frame: &mut Frame, area: Rect) {
    let msg = format!(
        "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
        area.width, area.height, MIN_WIDTH, MIN_HEIGHT
    );
    let paragraph = Paragraph::new(msg)
        .alignment(Alignment::Center)
        .style(Style::default().fg(ratatui::style::Color::Yellow));
    let centered = Rect::new(
        area.x,
        area.y + (area.height / 2).saturating_sub(2),
        area.width,
        5.min(area.height),
    );
    frame.render_widget(paragraph, centered);
}

fn render_chart(frame: &mut Frame, area: Rect, view: &DashboardView, dashboard: Option<&Dashboard>) {
    let locale = view.locale;
    let block = view.block(locale.processes_title);

    // A line needs at least two points.
    let Some(dashboard) = dashboard.filter(|d| d.history.len() > 1) else {
        let paragraph = Paragraph::new(locale.loading)
            .style(view.theme.placeholder)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let series = dashboard.process_series();
    let y_max = series.max.max(1.0).ceil();
    let x_max = (series.active.len() - 1) as f64;

    let datasets = vec![
        Dataset::default()
            .name(locale.active_processes)
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(view.theme.active))
            .data(&series.active),
        Dataset::default()
            .name(locale.idle_processes)
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(view.theme.idle))
            .data(&series.idle),
    ];

    let axis_style = Style::default().fg(view.theme.axis);
    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(Axis::default().style(axis_style).bounds([0.0, x_max]))
        .y_axis(
            Axis::default()
                .style(axis_style)
                .bounds([0.0, y_max])
                .labels(["0".to_string(), format!("{}", y_max as u64)]),
        );

    frame.render_widget(chart, area);
}

fn render_pool_gauge(
    frame: &mut Frame,
    area: Rect,
    view: &DashboardView,
    dashboard: Option<&Dashboard>,
) {
    let (percent, label) = match dashboard.and_then(|d| d.pool_gauge()) {
        Some((active, total, percent)) => {
            (percent as u16, format!("{}/{} ({}%)", active, total, percent))
        }
        None => (0, view.locale.loading.to_string()),
    };

    let gauge = Gauge::default()
        .block(view.block(view.locale.pool_load_title))
        .gauge_style(Style::default().fg(view.theme.pool_gauge))
        .percent(percent)
        .label(label);
    frame.render_widget(gauge, area);
}

fn render_rps_gauge(
    frame: &mut Frame,
    area: Rect,
    view: &DashboardView,
    dashboard: Option<&Dashboard>,
) {
    let (percent, label) = match dashboard {
        Some(d) => (
            d.metrics.rps_percent(),
            format!("{:.1} req/s", d.metrics.throughput_or_zero() as f64),
        ),
        None => (0, view.locale.loading.to_string()),
    };

    let gauge = Gauge::default()
        .block(view.block(view.locale.rps_title))
        .gauge_style(Style::default().fg(view.theme.rps_gauge))
        .percent(percent)
        .label(label);
    frame.render_widget(gauge, area);
}

fn render_avg_duration(
    frame: &mut Frame,
    area: Rect,
    view: &DashboardView,
    dashboard: Option<&Dashboard>,
) {
    let text = dashboard.map_or_else(
        || view.locale.loading.to_string(),
        |d| format_latency_ms(d.metrics.avg_latency_ms),
    );
    let paragraph = Paragraph::new(text).block(view.block(view.locale.avg_duration_title));
    frame.render_widget(paragraph, area);
}

fn render_slow_requests(
    frame: &mut Frame,
    area: Rect,
    view: &DashboardView,
    dashboard: Option<&Dashboard>,
) {
    let text = dashboard.map_or_else(
        || view.locale.loading.to_string(),
        |d| format!("{} {}", d.latest.slow_requests, view.locale.slow_requests_text),
    );
    let paragraph = Paragraph::new(text).block(view.block(view.locale.slow_requests_title));
    frame.render_widget(paragraph, area);
}

/// Label/value pairs for the pool info table.
pub fn info_rows(locale: &Locale, dashboard: Option<&Dashboard>) -> Vec<(&'static str, String)> {
    let labels = [
        locale.total_processes,
        locale.queue_length,
        locale.max_children,
        locale.uptime,
        locale.accepted_connections,
        locale.pool,
        locale.process_manager,
    ];

    let Some(d) = dashboard else {
        return labels.iter().map(|l| (*l, locale.loading.to_string())).collect();
    };

    let s = &d.latest;
    let values = [
        s.total_processes.to_string(),
        s.listen_queue_len.to_string(),
        s.max_children_reached.to_string(),
        format_uptime(s.start_since),
        s.accepted_conn.to_string(),
        s.pool.clone(),
        s.process_manager.clone(),
    ];
    labels.into_iter().zip(values).collect()
}

fn render_info(frame: &mut Frame, area: Rect, view: &DashboardView, dashboard: Option<&Dashboard>) {
    let rows: Vec<Row> = info_rows(view.locale, dashboard)
        .into_iter()
        .map(|(label, value)| {
            Row::new(vec![
                Cell::from(Span::styled(label, view.theme.label)),
                Cell::from(value),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Percentage(55), Constraint::Percentage(45)])
        .block(view.block(view.locale.info_title));
    frame.render_widget(table, area);
}

fn render_help(frame: &mut Frame, area: Rect, view: &DashboardView, health: &PollHealth) {
    let mut spans = vec![
        Span::raw(format!(" {} ", view.locale.exit)),
        Span::styled(format!("│ {} ", view.source), view.theme.placeholder),
    ];
    if health.is_failing() {
        let mut notice = format!("│ {} ({})", view.locale.fetch_failing, health.consecutive_failures);
        if let Some(ref error) = health.last_error {
            notice.push_str(": ");
            notice.push_str(error);
        }
        spans.push(Span::styled(notice, view.theme.failure));
    }
    let line = Line::from(spans);
    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(view.theme.border_type)
            .border_style(Style::default().fg(view.theme.border)),
    );
    frame.render_widget(paragraph, area);
}
