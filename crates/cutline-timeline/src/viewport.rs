//! Guard against scroll feedback loops.
//!
//! Setting `scroll_left` programmatically (zoom compensation, resize
//! restoration) makes the host emit a scroll event. That event must not be
//! written back into the model or zoom and scroll fight each other. The
//! guard marks a programmatic adjustment and ignores scroll events until it
//! ends plus a short settle window.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ScrollGuard {
    settle: Duration,
    adjusting: bool,
    settle_until: Option<Instant>,
}

impl ScrollGuard {
    pub fn new(settle: Duration) -> Self {
        Self {
            settle,
            adjusting: false,
            settle_until: None,
        }
    }

    pub fn from_millis(settle_ms: u64) -> Self {
        Self::new(Duration::from_millis(settle_ms))
    }

    /// Mark the start of a programmatic scroll adjustment.
    pub fn begin_programmatic(&mut self) {
        self.adjusting = true;
        self.settle_until = None;
    }

    /// Finish the adjustment; events keep being ignored for the settle window.
    pub fn end(&mut self, now: Instant) {
        self.adjusting = false;
        self.settle_until = Some(now + self.settle);
    }

    pub fn is_adjusting(&self, now: Instant) -> bool {
        self.adjusting || self.settle_until.is_some_and(|until| now < until)
    }

    /// Whether a user scroll event arriving at `now` should update the model.
    pub fn should_handle_scroll(&self, now: Instant) -> bool {
        !self.is_adjusting(now)
    }

    pub fn settle(&self) -> Duration {
        self.settle
    }
}

impl Default for ScrollGuard {
    fn default() -> Self {
        Self::from_millis(150)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_guard_handles_scroll() {
        let guard = ScrollGuard::default();
        assert!(guard.should_handle_scroll(Instant::now()));
    }

    #[test]
    fn test_ignores_scroll_while_adjusting() {
        let mut guard = ScrollGuard::from_millis(150);
        let now = Instant::now();
        guard.begin_programmatic();
        assert!(!guard.should_handle_scroll(now));

        guard.end(now);
        assert!(!guard.should_handle_scroll(now + Duration::from_millis(100)));
        assert!(guard.should_handle_scroll(now + Duration::from_millis(150)));
    }

    #[test]
    fn test_begin_cancels_pending_settle() {
        let mut guard = ScrollGuard::from_millis(10);
        let now = Instant::now();
        guard.end(now);
        guard.begin_programmatic();
        assert!(!guard.should_handle_scroll(now + Duration::from_secs(1)));
    }
}
