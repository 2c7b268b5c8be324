//! Cutline Media - Media sources and thumbnail extraction
//!
//! This crate handles:
//! - Random-access and seekable media source traits
//! - The asset store that loads sources in the background
//! - Synthetic colour-bar and still-image sources
//! - Sequential thumbnail extraction with supersession

pub mod assets;
pub mod error;
pub mod extract;
pub mod source;
pub mod synthetic;

pub use assets::{AssetState, AssetStore};
pub use error::MediaError;
pub use extract::{extract_single_frame, thumbnail_times, ExtractionTicket, ThumbnailExtractor};
pub use source::{AssetLoader, MediaSource, SeekableMedia, SharedSource, SourceSeeker};
pub use synthetic::{ColorBars, StillImage, SyntheticLoader};
