// Purpose: voices, polyphony, engine commands
// This layer sits between the channel table and the render engine

pub mod message;
pub mod poly;
pub mod voice;

pub use message::{CommandReceiver, EngineCommand};
pub use poly::VoicePool;
pub use voice::Voice;
