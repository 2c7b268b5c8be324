//! Timeline edit errors.

use cutline_core::CutlineError;
use thiserror::Error;

use crate::clip::ClipId;
use crate::track::TrackId;

/// Reasons an edit is rejected. A rejected edit leaves the model untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    #[error("Clip not found: {0}")]
    ClipNotFound(ClipId),

    #[error("Track is locked: {0}")]
    TrackLocked(TrackId),

    #[error("Clip {clip} would overlap clip {other}")]
    Overlap { clip: ClipId, other: ClipId },

    #[error("Clip duration {duration:.3}s is below the {min:.3}s minimum")]
    BelowMinDuration { duration: f64, min: f64 },

    #[error("Clip already on the timeline: {0}")]
    DuplicateClip(ClipId),

    #[error("Cannot split clip at {at:.3}s")]
    InvalidSplit { at: f64 },

    #[error("No room on track {0}")]
    NoRoom(TrackId),
}

pub type Result<T> = std::result::Result<T, TimelineError>;

impl From<TimelineError> for CutlineError {
    fn from(err: TimelineError) -> Self {
        match err {
            TimelineError::TrackNotFound(_) | TimelineError::ClipNotFound(_) => {
                CutlineError::NotFound(err.to_string())
            }
            _ => CutlineError::Timeline(err.to_string()),
        }
    }
}
