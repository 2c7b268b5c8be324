//! Cutline Timeline - Timeline data model and edit engine
//!
//! Implements the timeline side of the editor:
//! - Time↔pixel coordinate system and zoom math
//! - Tracks holding non-overlapping clips
//! - Snapping, drag and trim planning, split and duplicate
//! - The authoritative `Timeline` model and its shared handle

pub mod clip;
pub mod coords;
pub mod edit;
pub mod error;
pub mod layout;
pub mod selectors;
pub mod shared;
pub mod snapping;
pub mod state;
pub mod track;
pub mod viewport;
pub mod zoom;

pub use clip::{clips_overlap, Clip, ClipId, ClipPatch, EffectInstance};
pub use coords::{CoordinateParams, TimeRange};
pub use edit::{ClipBounds, DragState, TrimEdge, TrimState};
pub use error::TimelineError;
pub use layout::{clip_position, thumbnail_slots, ClipRect, ThumbnailSlot, TrackLayout};
pub use selectors::{PlaybackState, SelectionState, ViewState};
pub use shared::{SharedTimeline, TimelineSnapshot};
pub use snapping::{SnapKind, SnapPoint, SnappingEngine};
pub use state::Timeline;
pub use track::{Track, TrackId, TrackKind};
pub use viewport::ScrollGuard;
pub use zoom::{ZoomRange, ZOOM_PRESETS};
