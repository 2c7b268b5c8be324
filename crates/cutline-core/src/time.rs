//! Time formatting and frame/second conversion.
//!
//! Timeline time is plain `f64` seconds. Frame-accurate snapping is done at
//! the edges (display, export) via [`snap_to_frame`].

/// Frame rate assumed when none can be derived.
pub const DEFAULT_FPS: f64 = 30.0;

/// Format seconds as `MM:SS`, or `HH:MM:SS` past the hour.
///
/// Negative and non-finite values render as `00:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00".to_string();
    }
    let total = seconds.floor() as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Format seconds as `MM:SS.mmm`.
pub fn format_time_with_millis(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00.000".to_string();
    }
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    let millis = ((seconds % 1.0) * 1000.0).floor() as u64;
    format!("{minutes:02}:{secs:02}.{millis:03}")
}

/// Convert a frame number to seconds.
#[inline]
pub fn frame_to_time(frame: u64, fps: f64) -> f64 {
    if fps <= 0.0 {
        return 0.0;
    }
    frame as f64 / fps
}

/// Convert seconds to the frame number containing that instant.
#[inline]
pub fn time_to_frame(time: f64, fps: f64) -> u64 {
    if fps <= 0.0 || time <= 0.0 {
        return 0;
    }
    (time * fps).floor() as u64
}

/// Derive a frame rate from a duration and frame count.
pub fn calculate_fps(duration: f64, frame_count: u64) -> f64 {
    if duration <= 0.0 {
        return DEFAULT_FPS;
    }
    frame_count as f64 / duration
}

/// Snap a time to the nearest frame boundary.
pub fn snap_to_frame(time: f64, fps: f64) -> f64 {
    if fps <= 0.0 {
        return time;
    }
    (time * fps).round() / fps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(75.9), "01:15");
        assert_eq!(format_time(3723.0), "01:02:03");
        assert_eq!(format_time(-4.0), "00:00");
        assert_eq!(format_time(f64::NAN), "00:00");
    }

    #[test]
    fn test_format_time_with_millis() {
        assert_eq!(format_time_with_millis(61.25), "01:01.250");
        assert_eq!(format_time_with_millis(f64::INFINITY), "00:00.000");
    }

    #[test]
    fn test_frame_conversion() {
        assert_eq!(frame_to_time(48, 24.0), 2.0);
        assert_eq!(frame_to_time(10, 0.0), 0.0);
        assert_eq!(time_to_frame(2.01, 24.0), 48);
        assert_eq!(time_to_frame(-1.0, 24.0), 0);
    }

    #[test]
    fn test_calculate_fps() {
        assert_eq!(calculate_fps(0.0, 100), DEFAULT_FPS);
        assert_eq!(calculate_fps(10.0, 240), 24.0);
    }

    #[test]
    fn test_snap_to_frame() {
        let snapped = snap_to_frame(1.02, 30.0);
        assert!((snapped - 1.0333333).abs() < 1e-6);
        assert_eq!(snap_to_frame(1.02, 0.0), 1.02);
    }
}
