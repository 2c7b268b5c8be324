//! Shared handle to a timeline for the UI thread and the render loop.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::state::Timeline;
use crate::track::Track;

/// Cheap-to-clone handle; clones refer to the same timeline.
#[derive(Debug, Clone, Default)]
pub struct SharedTimeline {
    inner: Arc<RwLock<Timeline>>,
}

/// What a renderer needs for one frame, detached from the lock.
#[derive(Debug, Clone)]
pub struct TimelineSnapshot {
    pub current_time: f64,
    pub duration: f64,
    pub is_playing: bool,
    pub tracks: Arc<Vec<Track>>,
}

impl SharedTimeline {
    pub fn new(timeline: Timeline) -> Self {
        Self {
            inner: Arc::new(RwLock::new(timeline)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Timeline> {
        self.inner.read()
    }

    /// Run an action under the write lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut Timeline) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Copy out the playback state and the current track list.
    pub fn snapshot(&self) -> TimelineSnapshot {
        let timeline = self.inner.read();
        TimelineSnapshot {
            current_time: timeline.current_time(),
            duration: timeline.duration(),
            is_playing: timeline.is_playing(),
            tracks: timeline.tracks_arc(),
        }
    }
}

impl From<Timeline> for SharedTimeline {
    fn from(timeline: Timeline) -> Self {
        Self::new(timeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::Clip;
    use crate::track::TrackKind;

    #[test]
    fn test_update_and_snapshot() {
        let shared = SharedTimeline::default();
        let track = shared.update(|t| {
            t.set_duration(10.0);
            t.add_track(TrackKind::Video)
        });
        let clip = shared
            .update(|t| t.add_clip(track, Clip::new("a.mp4", 0.0, 4.0)))
            .unwrap();

        let before = shared.snapshot();
        shared.update(|t| t.move_clip(track, clip, 5.0)).unwrap();
        let after = shared.snapshot();

        assert_eq!(before.tracks[0].clips()[0].start, 0.0);
        assert_eq!(after.tracks[0].clips()[0].start, 5.0);
        assert_eq!(after.duration, 10.0);
    }

    #[test]
    fn test_clones_share_state() {
        let shared = SharedTimeline::default();
        let other = shared.clone();
        other.update(|t| t.set_duration(3.0));
        assert_eq!(shared.read().duration(), 3.0);
    }

    #[test]
    fn test_snapshot_across_threads() {
        let shared = SharedTimeline::default();
        shared.update(|t| t.set_duration(60.0));
        let reader = shared.clone();
        let handle = std::thread::spawn(move || {
            for _ in 0..100 {
                let snap = reader.snapshot();
                assert!(snap.current_time <= snap.duration);
            }
        });
        for i in 0..100 {
            shared.update(|t| t.set_current_time(i as f64 * 0.5));
        }
        handle.join().unwrap();
    }
}
