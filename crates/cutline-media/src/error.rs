//! Media error types.

use cutline_core::{CutlineError, MediaRef};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MediaError {
    #[error("Unsupported media: {0}")]
    Unsupported(MediaRef),

    #[error("Invalid media reference {src}: {reason}")]
    InvalidRef { src: MediaRef, reason: String },

    #[error("Failed to load {src}: {reason}")]
    LoadFailed { src: MediaRef, reason: String },

    #[error("Seek to {time:.3}s failed: {reason}")]
    SeekFailed { time: f64, reason: String },

    #[error("Frame capture failed at {time:.3}s")]
    CaptureFailed { time: f64 },

    #[error("Media has no usable duration")]
    NoDuration,

    #[error("Extraction superseded by a newer request")]
    Superseded,
}

pub type Result<T> = std::result::Result<T, MediaError>;

impl From<MediaError> for CutlineError {
    fn from(err: MediaError) -> Self {
        CutlineError::Media(err.to_string())
    }
}
