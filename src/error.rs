//! Error types for device and export operations.
//!
//! The render path never returns errors; everything here is raised on the
//! control side (opening a device, writing a file).

/// Errors surfaced by stepbox.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No output device is available on the system.
    #[error("no audio output device available")]
    NoDevice,

    /// The device exists but offers no usable stream configuration.
    #[error("unsupported output configuration: {0}")]
    UnsupportedConfig(String),

    /// Audio stream setup or runtime error.
    #[error("audio stream error: {0}")]
    Stream(String),

    /// WAV encoding error.
    #[error("WAV encoding error: {0}")]
    Wav(#[from] hound::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An export was cancelled before it finished.
    #[error("export cancelled")]
    Cancelled,
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, Error>;
