use std::collections::VecDeque;

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::runtime::channels::ChannelId;

/// Edits and transport changes sent to the render engine.
///
/// Step edits carry the absolute new value rather than "toggle", so the
/// sender can keep its own copy in sync even if a command is dropped.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum EngineCommand {
    Start,
    Stop,
    SetTempo { bpm: f64 },
    SetStep { channel: ChannelId, step: usize, active: bool },
    SetGain { channel: ChannelId, gain: f32 },
    SetPan { channel: ChannelId, pan: f32 },
}

/// Source of commands polled by the render engine at each block start.
///
/// Implementations must not block.
pub trait CommandReceiver {
    fn pop(&mut self) -> Option<EngineCommand>;
}

#[cfg(feature = "rtrb")]
impl CommandReceiver for Consumer<EngineCommand> {
    fn pop(&mut self) -> Option<EngineCommand> {
        Consumer::pop(self).ok()
    }
}

/// Single-threaded queue, used when the caller drives the engine directly
/// (tests, offline tools).
impl CommandReceiver for VecDeque<EngineCommand> {
    fn pop(&mut self) -> Option<EngineCommand> {
        self.pop_front()
    }
}
