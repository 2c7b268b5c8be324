//! Clip types for the timeline.

use cutline_core::MediaRef;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub type ClipId = Uuid;

/// Tolerance for comparing clip durations against the minimum.
pub const TIME_EPSILON: f64 = 1e-9;

/// An effect attached to a clip. Parameters are opaque to the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectInstance {
    pub id: Uuid,
    /// Effect identifier, e.g. "blur" or "brightness".
    pub kind: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl EffectInstance {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: kind.into(),
            params: Map::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }
}

/// A clip on the timeline.
///
/// `start`/`end` are timeline seconds; `offset` is the source time shown at
/// `start`. The visible source range is `[offset, offset + duration)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: ClipId,
    pub src: MediaRef,
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub offset: f64,
    #[serde(default)]
    pub effects: Vec<EffectInstance>,
}

impl Clip {
    pub fn new(src: impl Into<MediaRef>, start: f64, end: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            src: src.into(),
            start,
            end,
            offset: 0.0,
            effects: Vec::new(),
        }
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_effect(mut self, effect: EffectInstance) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Source out point.
    pub fn source_out(&self) -> f64 {
        self.offset + self.duration()
    }

    /// Half-open activity test: `start <= t < end`.
    #[inline]
    pub fn is_active_at(&self, time: f64) -> bool {
        time >= self.start && time < self.end
    }

    /// Source media time shown at timeline `time`, if the clip is active.
    pub fn source_time_at(&self, time: f64) -> Option<f64> {
        self.is_active_at(time).then(|| self.offset + (time - self.start))
    }

    pub fn overlaps(&self, other: &Clip) -> bool {
        clips_overlap(self, other)
    }

    /// Whether the clip is at least `min_duration` long.
    pub fn meets_min_duration(&self, min_duration: f64) -> bool {
        self.duration() + TIME_EPSILON >= min_duration
    }

    /// Split at timeline time `at`, returning `(left, right)`.
    ///
    /// The left half keeps this clip's id; the right half gets a new id and
    /// an offset advanced by the split distance. Returns `None` unless both
    /// halves would be at least `min_duration` long.
    pub fn split_at(&self, at: f64, min_duration: f64) -> Option<(Clip, Clip)> {
        if !at.is_finite()
            || at - self.start + TIME_EPSILON < min_duration
            || self.end - at + TIME_EPSILON < min_duration
        {
            return None;
        }

        let mut left = self.clone();
        left.end = at;

        let mut right = self.duplicate();
        right.start = at;
        right.offset = self.offset + (at - self.start);

        Some((left, right))
    }

    /// Copy with fresh clip and effect ids.
    pub fn duplicate(&self) -> Clip {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4();
        for effect in &mut copy.effects {
            effect.id = Uuid::new_v4();
        }
        copy
    }
}

/// Overlap test for two clips on the same track.
///
/// Touching clips (`a.end == b.start`) do not overlap.
#[inline]
pub fn clips_overlap(a: &Clip, b: &Clip) -> bool {
    a.start < b.end && b.start < a.end
}

/// A partial update to a clip. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipPatch {
    pub src: Option<MediaRef>,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub offset: Option<f64>,
    pub effects: Option<Vec<EffectInstance>>,
}

impl ClipPatch {
    pub fn bounds(start: f64, end: f64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }

    pub fn offset(offset: f64) -> Self {
        Self {
            offset: Some(offset),
            ..Self::default()
        }
    }

    pub fn effects(effects: Vec<EffectInstance>) -> Self {
        Self {
            effects: Some(effects),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Patched copy of `clip`.
    pub fn apply_to(&self, clip: &Clip) -> Clip {
        let mut next = clip.clone();
        if let Some(src) = &self.src {
            next.src = src.clone();
        }
        if let Some(start) = self.start {
            next.start = start;
        }
        if let Some(end) = self.end {
            next.end = end;
        }
        if let Some(offset) = self.offset {
            next.offset = offset;
        }
        if let Some(effects) = &self.effects {
            next.effects = effects.clone();
        }
        next
    }
}
