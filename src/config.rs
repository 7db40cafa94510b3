//! Engine configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{sequencing::clock, MAX_BLOCK_SIZE, SAMPLE_RATE};

/// Default number of simultaneously mixed voices.
pub const DEFAULT_MAX_VOICES: usize = 64;

/// Default render block size in frames.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Default per-block meter decay factor.
pub const DEFAULT_METER_DECAY: f32 = 0.9;

/// Static settings shared by the render engine, controller and exporter.
///
/// Out-of-range values are never rejected; [`EngineConfig::validated`]
/// clamps them into their legal ranges.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Frames rendered per engine block
    pub block_size: usize,
    /// Polyphony cap
    pub max_voices: usize,
    /// Multiplicative meter decay applied once per block (0.0-1.0)
    pub meter_decay: f32,
    /// Initial tempo in beats per minute
    pub bpm: f64,
    /// Seed for the noise used by the instrument synthesizers
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            block_size: DEFAULT_BLOCK_SIZE,
            max_voices: DEFAULT_MAX_VOICES,
            meter_decay: DEFAULT_METER_DECAY,
            bpm: 140.0,
            seed: 0x5EED,
        }
    }
}

impl EngineConfig {
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn max_voices(mut self, max_voices: usize) -> Self {
        self.max_voices = max_voices;
        self
    }

    pub fn meter_decay(mut self, decay: f32) -> Self {
        self.meter_decay = decay;
        self
    }

    pub fn bpm(mut self, bpm: f64) -> Self {
        self.bpm = bpm;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Clamp every field into its legal range.
    pub fn validated(self) -> Self {
        let meter_decay = if self.meter_decay.is_finite() {
            self.meter_decay.clamp(0.0, 0.999)
        } else {
            DEFAULT_METER_DECAY
        };

        Self {
            sample_rate: self.sample_rate.max(1),
            block_size: self.block_size.clamp(1, MAX_BLOCK_SIZE),
            max_voices: self.max_voices.max(1),
            meter_decay,
            bpm: clock::clamp_bpm(self.bpm).unwrap_or(clock::DEFAULT_BPM),
            seed: self.seed,
        }
    }
}
