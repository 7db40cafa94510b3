//! Built-in instrument synthesizers.
//!
//! Every instrument is rendered once, at kit-build time, into an immutable
//! [`SampleBuffer`]. Nothing here runs on the audio thread.
//!
//! # Example
//!
//! ```ignore
//! use stepbox::{dsp::NoiseSource, voices::Instrument};
//!
//! let mut noise = NoiseSource::seeded(42);
//! let kick = Instrument::Kick.render(44_100, &mut noise);
//! let hat = Instrument::OpenHat.render(44_100, &mut noise);
//! ```

pub mod buffer;
mod clap;
mod hihat;
mod kick;
mod snare;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use buffer::SampleBuffer;
pub use clap::{clap, ClapParams};
pub use hihat::{closed_hat, hihat, open_hat, HatParams};
pub use kick::{kick, KickParams};
pub use snare::{snare, SnareParams};

use crate::dsp::NoiseSource;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instrument {
    Kick,
    Snare,
    ClosedHat,
    OpenHat,
    Clap,
}

impl Instrument {
    pub const ALL: [Instrument; 5] = [
        Instrument::Kick,
        Instrument::Snare,
        Instrument::ClosedHat,
        Instrument::OpenHat,
        Instrument::Clap,
    ];

    /// Render this instrument with its default parameters.
    pub fn render(self, sample_rate: u32, noise: &mut NoiseSource) -> SampleBuffer {
        match self {
            Instrument::Kick => kick(&KickParams::default(), sample_rate, noise),
            Instrument::Snare => snare(&SnareParams::default(), sample_rate, noise),
            Instrument::ClosedHat => hihat(&HatParams::closed(), sample_rate, noise),
            Instrument::OpenHat => hihat(&HatParams::open(), sample_rate, noise),
            Instrument::Clap => clap(&ClapParams::default(), sample_rate, noise),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Instrument::Kick => "Kick",
            Instrument::Snare => "Snare",
            Instrument::ClosedHat => "Hat (C)",
            Instrument::OpenHat => "Hat (O)",
            Instrument::Clap => "Clap",
        }
    }
}
