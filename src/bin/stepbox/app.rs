//! App - owns the controller and audio output, maps keys to edits

use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;

use stepbox::{
    io::AudioOutput,
    runtime::{engine_pair, ChannelId, ChannelTable, EngineController, Rgb},
    EngineConfig, STEPS_PER_BAR,
};

use super::ui;

/// File written by the export key.
pub const EXPORT_PATH: &str = "stepbox.wav";

const TEMPO_STEP: f64 = 1.0;
const GAIN_STEP: f32 = 0.05;
const PAN_STEP: f32 = 0.05;

/// Colors cycled through with `c`.
pub const PALETTE: [Rgb; 6] = [
    [0x29, 0x62, 0xFF],
    [0x45, 0x5A, 0x64],
    [0x00, 0xB0, 0xFF],
    [0x80, 0xD8, 0xFF],
    [0x00, 0xE5, 0xFF],
    [0xFF, 0x6D, 0x00],
];

pub struct App {
    pub controller: EngineController,
    pub output: AudioOutput,
    /// Selected row
    pub channel: usize,
    /// Selected step
    pub step: usize,
    /// Last message shown in the status line
    pub status: String,
    should_quit: bool,
}

impl App {
    pub fn new(config: EngineConfig, kit: ChannelTable) -> Self {
        let (controller, engine) = engine_pair(config, kit);
        let output = AudioOutput::open(engine);
        let status = output.mode().to_string();

        Self {
            controller,
            output,
            channel: 0,
            step: 0,
            status,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, self))?;

            // ~60fps; meters are polled on every redraw
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }
        Ok(())
    }

    fn selected(&self) -> ChannelId {
        ChannelId(self.channel)
    }

    fn handle_key(&mut self, key: KeyCode) {
        let channels = self.controller.channels().len();
        let id = self.selected();

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => self.controller.toggle_playback(),
            KeyCode::Up => self.channel = self.channel.saturating_sub(1),
            KeyCode::Down => self.channel = (self.channel + 1).min(channels.saturating_sub(1)),
            KeyCode::Left => self.step = self.step.saturating_sub(1),
            KeyCode::Right => self.step = (self.step + 1).min(STEPS_PER_BAR - 1),
            KeyCode::Enter | KeyCode::Char('x') => {
                if self.controller.toggle_step(id, self.step).is_none() {
                    self.status = "edit dropped, engine busy".into();
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let bpm = self.controller.bpm() + TEMPO_STEP;
                self.controller.set_tempo(bpm);
            }
            KeyCode::Char('-') => {
                let bpm = self.controller.bpm() - TEMPO_STEP;
                self.controller.set_tempo(bpm);
            }
            KeyCode::Char('[') => self.nudge_gain(-GAIN_STEP),
            KeyCode::Char(']') => self.nudge_gain(GAIN_STEP),
            KeyCode::Char(',') => self.nudge_pan(-PAN_STEP),
            KeyCode::Char('.') => self.nudge_pan(PAN_STEP),
            KeyCode::Char('c') => self.cycle_color(),
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
    }

    fn nudge_gain(&mut self, delta: f32) {
        let id = self.selected();
        if let Some(gain) = self.controller.channels().gain(id) {
            self.controller.set_gain(id, gain + delta);
        }
    }

    fn nudge_pan(&mut self, delta: f32) {
        let id = self.selected();
        if let Some(pan) = self.controller.channels().pan(id) {
            self.controller.set_pan(id, pan + delta);
        }
    }

    fn cycle_color(&mut self) {
        let id = self.selected();
        let Some(current) = self.controller.channels().color(id) else {
            return;
        };
        let next = PALETTE
            .iter()
            .position(|&c| c == current)
            .map(|i| PALETTE[(i + 1) % PALETTE.len()])
            .unwrap_or(PALETTE[0]);
        self.controller.recolor(id, next);
    }

    fn export(&mut self) {
        self.status = match self.controller.export(EXPORT_PATH, 1) {
            Ok(summary) => format!(
                "exported {} ({} frames)",
                summary.path.display(),
                summary.frames
            ),
            Err(err) => format!("export failed: {err}"),
        };
    }
}
