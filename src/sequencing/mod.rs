pub mod clock;
pub mod pattern;

pub use clock::{samples_per_step, SequencerClock, StepTrigger, TransportState};
pub use pattern::StepPattern;
