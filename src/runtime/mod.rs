//! Real-time side of the drum machine.
//!
//! [`RenderEngine`] runs on the audio thread and owns its own copy of the
//! [`ChannelTable`]. [`EngineController`] runs on the UI thread, owns the
//! authoritative copy and forwards edits as commands. Meters and transport
//! come back through a shared [`EngineMonitor`].
//!
//! # Example
//!
//! ```ignore
//! use stepbox::{io::AudioOutput, runtime::{engine_pair, ChannelTable}, EngineConfig};
//!
//! let config = EngineConfig::default().bpm(128.0);
//! let kit = ChannelTable::standard_kit(config.sample_rate, config.seed);
//! let (mut controller, engine) = engine_pair(config, kit);
//! let _output = AudioOutput::open(engine);
//! controller.start();
//! ```

pub mod channels;
#[cfg(feature = "rtrb")]
pub mod controller;
pub mod engine;
pub mod meter;
pub mod monitor;

pub use channels::{ChannelId, ChannelSpec, ChannelTable, Rgb, MAX_CHANNELS};
#[cfg(feature = "rtrb")]
pub use controller::{engine_pair, EngineController, COMMAND_QUEUE_SIZE};
pub use engine::RenderEngine;
pub use meter::PeakMeter;
pub use monitor::{EngineMonitor, MeterSnapshot};
