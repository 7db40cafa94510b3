//! Channel rack widget - one row of 16 steps per channel, playhead below

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use stepbox::STEPS_PER_BAR;

use super::{rgb, App};

const NAME_WIDTH: usize = 9;

pub fn render_rack(frame: &mut Frame, area: Rect, app: &App) {
    if area.height < 2 || area.width < 40 {
        return;
    }

    let table = app.controller.channels();
    let playing = app.controller.is_running();
    let playhead = app.controller.current_step();
    let mut lines = Vec::with_capacity(table.len() + 2);

    // Beat markers row
    let mut markers = " ".repeat(NAME_WIDTH);
    for step in 0..STEPS_PER_BAR {
        if step % 4 == 0 {
            markers.push_str(&format!("{:<3}", step / 4 + 1));
        } else {
            markers.push_str("   ");
        }
    }
    lines.push(Line::from(Span::styled(markers, Style::default().fg(Color::DarkGray))));

    for id in table.ids() {
        let name = table.name(id).unwrap_or("");
        let color = table.color(id).map(rgb).unwrap_or(Color::Gray);
        let selected_row = id.0 == app.channel;

        let mut spans = Vec::with_capacity(STEPS_PER_BAR + 2);
        spans.push(Span::styled(
            format!("{:<width$.width$}", name, width = NAME_WIDTH - 1) + " ",
            Style::default().fg(if selected_row { Color::White } else { Color::Gray }),
        ));

        for step in 0..STEPS_PER_BAR {
            let active = table.is_step_active(id, step);
            let mut style = if active {
                Style::default().fg(color)
            } else if step / 4 % 2 == 0 {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Gray)
            };
            if selected_row && step == app.step {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(if active { "██ " } else { "░░ " }, style));
        }

        spans.push(Span::styled(
            format!(
                " g{:.2} p{:.2}",
                table.gain(id).unwrap_or(0.0),
                table.pan(id).unwrap_or(0.5)
            ),
            Style::default().fg(Color::DarkGray),
        ));
        lines.push(Line::from(spans));
    }

    // Playhead row
    let mut head = " ".repeat(NAME_WIDTH);
    for step in 0..STEPS_PER_BAR {
        head.push_str(if playing && step == playhead { "▲  " } else { "   " });
    }
    lines.push(Line::from(Span::styled(head, Style::default().fg(Color::Yellow))));

    frame.render_widget(Paragraph::new(lines), area);
}
