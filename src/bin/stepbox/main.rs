//! stepbox - terminal drum machine
//!
//! Run with: cargo run -- --bpm 128
//! Bounce without audio: cargo run -- --export loop.wav --repeats 4

mod app;
mod ui;

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

use stepbox::{
    io::Exporter,
    runtime::ChannelTable,
    sequencing::clock::DEFAULT_BPM,
    EngineConfig,
};

use app::App;

#[derive(Parser, Debug)]
#[command(name = "stepbox")]
#[command(version, about = "Procedural drum machine with a 16-step sequencer", long_about = None)]
struct Args {
    /// Tempo in beats per minute (20-400)
    #[arg(long, default_value_t = DEFAULT_BPM)]
    bpm: f64,

    /// Seed for instrument noise
    #[arg(long, default_value_t = 0x5EED)]
    seed: u64,

    /// Render block size in frames
    #[arg(long, default_value_t = stepbox::config::DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Maximum simultaneous voices
    #[arg(long, default_value_t = stepbox::config::DEFAULT_MAX_VOICES)]
    max_voices: usize,

    /// Render the pattern to this WAV file and exit
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Bars to render with --export
    #[arg(long, default_value_t = 1)]
    repeats: usize,

    /// Write logs here while the TUI is running
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> EngineConfig {
        EngineConfig::default()
            .bpm(self.bpm)
            .seed(self.seed)
            .block_size(self.block_size)
            .max_voices(self.max_voices)
            .validated()
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let config = args.config();

    if let Some(path) = &args.export {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .init();
        return export(config, path, args.repeats);
    }

    // The terminal belongs to the TUI; logs only go to a file
    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }

    tracing::info!(bpm = config.bpm, block_size = config.block_size, "starting stepbox");
    let kit = ChannelTable::standard_kit(config.sample_rate, config.seed);
    let mut app = App::new(config, kit);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}

fn export(config: EngineConfig, path: &Path, repeats: usize) -> EyreResult<()> {
    let kit = ChannelTable::standard_kit(config.sample_rate, config.seed);
    let summary = Exporter::new(config.bpm)
        .repeats(repeats)
        .sample_rate(config.sample_rate)
        .write(&kit, path)
        .wrap_err_with(|| format!("failed to export {}", path.display()))?;

    tracing::info!(
        path = %summary.path.display(),
        frames = summary.frames,
        bytes = summary.bytes,
        peak = summary.peak_before_normalize,
        "export finished"
    );
    println!(
        "{}: {} frames, {} bytes",
        summary.path.display(),
        summary.frames,
        summary.bytes
    );
    Ok(())
}
