//! TUI module for stepbox
//!
//! Channel rack with a moving playhead, per-channel meters and transport.

mod meters;
mod rack;
mod transport;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use stepbox::runtime::Rgb;

use super::app::App;

use meters::render_meters;
use rack::render_rack;
use transport::render_transport;

pub fn rgb(color: Rgb) -> Color {
    Color::Rgb(color[0], color[1], color[2])
}

/// Render the whole screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let channels = app.controller.channels().len() as u16;

    // Main layout: transport, rack, meters, status, help
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Transport bar
            Constraint::Length(channels + 3), // Channel rack
            Constraint::Min(channels + 3),    // Meters
            Constraint::Length(1),            // Status line
            Constraint::Length(1),            // Help bar
        ])
        .split(area);

    render_transport(frame, chunks[0], app);

    let rack_block = Block::default().title(" Channel Rack ").borders(Borders::ALL);
    let rack_inner = rack_block.inner(chunks[1]);
    frame.render_widget(rack_block, chunks[1]);
    render_rack(frame, rack_inner, app);

    let meter_block = Block::default().title(" Meters ").borders(Borders::ALL);
    let meter_inner = meter_block.inner(chunks[2]);
    frame.render_widget(meter_block, chunks[2]);
    render_meters(frame, meter_inner, app);

    let status = Paragraph::new(format!(" {}", app.status)).style(Style::default().fg(Color::Gray));
    frame.render_widget(status, chunks[3]);

    let help = Paragraph::new(
        " [Space] Play/Stop  [Arrows] Move  [Enter/x] Toggle  [+/-] Tempo  [ [ ] ] Gain  [, .] Pan  [c] Color  [e] Export  [q] Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[4]);
}
