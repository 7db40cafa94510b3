//! Channel table - struct-of-arrays storage for the drum rack
//!
//! Channels are addressed by a small integer [`ChannelId`]. Each column
//! (buffers, steps, gains, pans, names, colors) is its own array, and the
//! table has a fixed capacity, so the render path can read a row with plain
//! bounds-checked indexing and never reallocates.

use std::fmt;

use crate::{
    dsp::NoiseSource,
    sequencing::StepPattern,
    voices::{Instrument, SampleBuffer},
};

/// Maximum number of channels in one table.
pub const MAX_CHANNELS: usize = 32;

/// Index of a channel in a [`ChannelTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub usize);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ch{}", self.0)
    }
}

/// RGB color used by front ends. Has no effect on audio.
pub type Rgb = [u8; 3];

/// Everything needed to add a channel.
#[derive(Debug, Clone)]
pub struct ChannelSpec {
    pub name: String,
    pub buffer: SampleBuffer,
    pub steps: StepPattern,
    pub gain: f32,
    pub pan: f32,
    pub color: Rgb,
}

impl ChannelSpec {
    pub fn new(name: impl Into<String>, buffer: SampleBuffer) -> Self {
        Self {
            name: name.into(),
            buffer,
            steps: StepPattern::new(),
            gain: 0.8,
            pan: 0.5,
            color: [0x60, 0x7D, 0x8B],
        }
    }

    pub fn steps(mut self, steps: StepPattern) -> Self {
        self.steps = steps;
        self
    }

    pub fn gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    pub fn pan(mut self, pan: f32) -> Self {
        self.pan = pan;
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }
}

/// Clamp a gain or pan into [0, 1]. NaN is rejected.
pub fn clamp_unit(value: f32) -> Option<f32> {
    if value.is_nan() {
        None
    } else {
        Some(value.clamp(0.0, 1.0))
    }
}

/// Ordered channels, one column per attribute.
#[derive(Debug, Clone)]
pub struct ChannelTable {
    names: Vec<String>,
    colors: Vec<Rgb>,
    buffers: Vec<SampleBuffer>,
    steps: Vec<StepPattern>,
    gains: Vec<f32>,
    pans: Vec<f32>,
}

impl Default for ChannelTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelTable {
    pub fn new() -> Self {
        Self {
            names: Vec::with_capacity(MAX_CHANNELS),
            colors: Vec::with_capacity(MAX_CHANNELS),
            buffers: Vec::with_capacity(MAX_CHANNELS),
            steps: Vec::with_capacity(MAX_CHANNELS),
            gains: Vec::with_capacity(MAX_CHANNELS),
            pans: Vec::with_capacity(MAX_CHANNELS),
        }
    }

    /// The five-piece kit: kick, clap, closed hat, open hat, snare.
    ///
    /// Every buffer is synthesized here, so this is the expensive call; do it
    /// before audio starts.
    pub fn standard_kit(sample_rate: u32, seed: u64) -> Self {
        let mut noise = NoiseSource::seeded(seed);
        let mut table = Self::new();

        let rows: [(Instrument, &[usize], f32, f32, Rgb); 5] = [
            (Instrument::Kick, &[0, 8], 0.9, 0.5, [0x29, 0x62, 0xFF]),
            (Instrument::Clap, &[4, 12], 0.8, 0.5, [0x45, 0x5A, 0x64]),
            (
                Instrument::ClosedHat,
                &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
                0.6,
                0.4,
                [0x00, 0xB0, 0xFF],
            ),
            (Instrument::OpenHat, &[2, 6, 10, 14], 0.6, 0.6, [0x80, 0xD8, 0xFF]),
            (Instrument::Snare, &[15], 0.8, 0.5, [0x00, 0xE5, 0xFF]),
        ];

        for (instrument, active, gain, pan, color) in rows {
            let buffer = instrument.render(sample_rate, &mut noise);
            table.add(
                ChannelSpec::new(instrument.label(), buffer)
                    .steps(StepPattern::from_active(active))
                    .gain(gain)
                    .pan(pan)
                    .color(color),
            );
        }

        table
    }

    /// Append a channel. Returns `None` once the table is full.
    pub fn add(&mut self, spec: ChannelSpec) -> Option<ChannelId> {
        if self.len() >= MAX_CHANNELS {
            return None;
        }

        let id = ChannelId(self.len());
        self.names.push(spec.name);
        self.colors.push(spec.color);
        self.buffers.push(spec.buffer);
        self.steps.push(spec.steps);
        self.gains.push(clamp_unit(spec.gain).unwrap_or(0.0));
        self.pans.push(clamp_unit(spec.pan).unwrap_or(0.5));
        Some(id)
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn contains(&self, id: ChannelId) -> bool {
        id.0 < self.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = ChannelId> {
        (0..self.len()).map(ChannelId)
    }

    // --- reads ---

    pub fn name(&self, id: ChannelId) -> Option<&str> {
        self.names.get(id.0).map(String::as_str)
    }

    pub fn color(&self, id: ChannelId) -> Option<Rgb> {
        self.colors.get(id.0).copied()
    }

    pub fn buffer(&self, id: ChannelId) -> Option<&SampleBuffer> {
        self.buffers.get(id.0)
    }

    pub fn steps(&self, id: ChannelId) -> Option<&StepPattern> {
        self.steps.get(id.0)
    }

    pub fn gain(&self, id: ChannelId) -> Option<f32> {
        self.gains.get(id.0).copied()
    }

    pub fn pan(&self, id: ChannelId) -> Option<f32> {
        self.pans.get(id.0).copied()
    }

    #[inline]
    pub fn is_step_active(&self, id: ChannelId, step: usize) -> bool {
        self.steps
            .get(id.0)
            .map(|pattern| pattern.is_active(step))
            .unwrap_or(false)
    }

    // --- writes ---

    /// Flip one step, returning its new value.
    pub fn toggle_step(&mut self, id: ChannelId, step: usize) -> Option<bool> {
        self.steps.get_mut(id.0)?.toggle(step)
    }

    /// Set one step. Returns `false` for an unknown channel or step.
    pub fn set_step(&mut self, id: ChannelId, step: usize, active: bool) -> bool {
        self.steps
            .get_mut(id.0)
            .map(|pattern| pattern.set(step, active))
            .unwrap_or(false)
    }

    pub fn set_steps(&mut self, id: ChannelId, pattern: StepPattern) -> bool {
        match self.steps.get_mut(id.0) {
            Some(slot) => {
                *slot = pattern;
                true
            }
            None => false,
        }
    }

    /// Set gain, clamped to [0, 1]. Returns the value stored.
    pub fn set_gain(&mut self, id: ChannelId, gain: f32) -> Option<f32> {
        let gain = clamp_unit(gain)?;
        let slot = self.gains.get_mut(id.0)?;
        *slot = gain;
        Some(gain)
    }

    /// Set pan, clamped to [0, 1]. Returns the value stored.
    pub fn set_pan(&mut self, id: ChannelId, pan: f32) -> Option<f32> {
        let pan = clamp_unit(pan)?;
        let slot = self.pans.get_mut(id.0)?;
        *slot = pan;
        Some(pan)
    }

    pub fn rename(&mut self, id: ChannelId, name: impl Into<String>) -> bool {
        match self.names.get_mut(id.0) {
            Some(slot) => {
                *slot = name.into();
                true
            }
            None => false,
        }
    }

    pub fn recolor(&mut self, id: ChannelId, color: Rgb) -> bool {
        match self.colors.get_mut(id.0) {
            Some(slot) => {
                *slot = color;
                true
            }
            None => false,
        }
    }
}
