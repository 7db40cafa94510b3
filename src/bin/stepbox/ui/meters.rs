//! Meter widget - smoothed peak per channel plus master

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Gauge, Paragraph},
    Frame,
};

use super::{rgb, App};

const LABEL_WIDTH: u16 = 9;

fn meter_row(frame: &mut Frame, area: Rect, label: &str, level: f32, color: Color) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(LABEL_WIDTH), Constraint::Min(1)])
        .split(area);

    frame.render_widget(
        Paragraph::new(format!("{label:<8.8}")).style(Style::default().fg(Color::Gray)),
        cols[0],
    );
    frame.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .ratio(level.clamp(0.0, 1.0) as f64)
            .label(format!("{level:.2}")),
        cols[1],
    );
}

pub fn render_meters(frame: &mut Frame, area: Rect, app: &App) {
    let table = app.controller.channels();
    let snapshot = app.controller.meters();
    let rows = table.len() + 1;
    if (area.height as usize) < rows {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); rows])
        .split(area);

    for (id, row) in table.ids().zip(chunks.iter()) {
        let level = snapshot.channels.get(id.0).copied().unwrap_or(0.0);
        let color = table.color(id).map(rgb).unwrap_or(Color::Gray);
        meter_row(frame, *row, table.name(id).unwrap_or(""), level, color);
    }

    if let Some(row) = chunks.last() {
        let color = if snapshot.master >= 1.0 { Color::Red } else { Color::Green };
        meter_row(frame, *row, "Master", snapshot.master, color);
    }
}
