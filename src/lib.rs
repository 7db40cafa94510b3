//! stepbox - procedural drum machine engine
//!
//! Instruments are synthesized once into immutable buffers, a 16-step grid
//! triggers them on sample-accurate boundaries, and the render engine mixes
//! every sounding voice into a clipped stereo stream. The same channel table
//! can be bounced offline to a 16-bit WAV file.

pub mod config;
pub mod dsp; // Filters, pan law, noise, clipping
pub mod error;
pub mod io; // Audio device output and WAV export
pub mod runtime; // Channel table, render engine, meters, controller
pub mod sequencing; // Step patterns and the sequencer clock
pub mod synth; // Voices, polyphony, engine commands
pub mod voices; // Built-in instrument synthesizers

pub use config::EngineConfig;
pub use error::{Error, Result};

/// Largest block the render engine accepts in one call.
pub const MAX_BLOCK_SIZE: usize = 2048;

/// Engine and export sample rate in Hz.
pub const SAMPLE_RATE: u32 = 44_100;

/// Steps in one bar of the grid (sixteenth notes in 4/4).
pub const STEPS_PER_BAR: usize = 16;
