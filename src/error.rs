//! Error types for riffle.

use thiserror::Error;

/// Errors raised while building or draining a signal pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// A caller-supplied argument is outside what the operation accepts.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A never-exhausting wrapper was given a source with nothing to hold.
    #[error("Source exhausted before producing a value; there's nothing to repeat")]
    ExhaustedWithNoData,

    /// The device-stream collaborator failed to accept or deliver a buffer.
    #[error("Device error: {0}")]
    Device(String),

    /// The container holds sample data with no matching `SampleFormat`.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// WAV encode or decode failure.
    #[cfg(feature = "wav")]
    #[error("WAV: {0}")]
    Wav(#[from] hound::Error),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}

/// Result type for riffle operations
pub type Result<T> = std::result::Result<T, Error>;
