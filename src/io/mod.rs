// Purpose - audio device output and offline WAV export

pub mod device;
pub mod wav;

pub use device::{AudioOutput, OutputMode};
pub use wav::{encode_wav, ExportSummary, Exporter, StereoBuffer};
