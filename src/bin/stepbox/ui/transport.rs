//! Transport bar widget - shows BPM, play state, step, voices and output

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::App;

pub fn render_transport(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title(" stepbox ").borders(Borders::ALL);

    let controller = &app.controller;
    let monitor = controller.monitor();
    let playing = controller.is_running();

    let play_symbol = if playing { "▶" } else { "■" };
    let play_state = if playing { "Playing" } else { "Stopped" };
    let step = monitor.current_step();
    let seconds = monitor.elapsed_samples() as f64 / controller.config().sample_rate as f64;

    let line = Line::from(vec![
        Span::styled(
            format!(" BPM: {:.0}  ", controller.bpm()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{play_symbol} {play_state}  "),
            Style::default().fg(if playing { Color::Green } else { Color::Yellow }),
        ),
        Span::styled(
            format!("Beat {} | Step {:>2}  ", step / 4 + 1, step + 1),
            Style::default().fg(Color::White),
        ),
        Span::styled(format!("{seconds:>6.1}s  "), Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!(
                "Voices: {}/{}  evicted {}  ",
                monitor.active_voices(),
                controller.config().max_voices,
                monitor.evicted_voices()
            ),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(
            app.output.mode().to_string(),
            Style::default().fg(if app.output.is_silent() {
                Color::Red
            } else {
                Color::DarkGray
            }),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
