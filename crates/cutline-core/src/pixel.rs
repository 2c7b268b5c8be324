//! Pixel math helpers shared by the coordinate system and drag handlers.

/// Clamp a value between min and max.
///
/// Unlike [`f64::clamp`] this never panics when `min > max`; `min` wins.
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Round to the nearest integer pixel to avoid sub-pixel seams.
#[inline]
pub fn round_px(value: f64) -> f64 {
    value.round()
}

/// Floor to an integer pixel, for index calculations.
#[inline]
pub fn floor_px(value: f64) -> f64 {
    value.floor()
}

/// Percentage of `value` between `min` and `max`; 0 for an empty range.
#[inline]
pub fn percentage(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 0.0;
    }
    (value - min) / (max - min) * 100.0
}

/// Linear interpolation.
#[inline]
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

/// Inverse of [`lerp`]: where `value` sits between `start` and `end`.
#[inline]
pub fn inverse_lerp(start: f64, end: f64, value: f64) -> f64 {
    if end == start {
        return 0.0;
    }
    (value - start) / (end - start)
}

/// Division that yields 0 instead of NaN/inf for a zero or non-finite result.
#[inline]
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let q = numerator / denominator;
    if q.is_finite() {
        q
    } else {
        0.0
    }
}
