//! Time-driven cross-fade between two snapshots.

use super::BufferSnapshot;
use std::time::Duration;

/// A cross-fade from one snapshot to another over a fixed duration.
///
/// Frames are pure functions of elapsed time, so a caller can drive this
/// from any clock (a ticker thread, a test, a recorded timeline).
#[derive(Debug, Clone)]
pub struct Crossfade {
    from: BufferSnapshot,
    to: BufferSnapshot,
    duration: Duration,
}

impl Crossfade {
    /// Create a cross-fade.
    pub const fn new(from: BufferSnapshot, to: BufferSnapshot, duration: Duration) -> Self {
        Self { from, to, duration }
    }

    /// Starting snapshot.
    pub const fn from(&self) -> &BufferSnapshot {
        &self.from
    }

    /// Target snapshot.
    pub const fn to(&self) -> &BufferSnapshot {
        &self.to
    }

    /// Total duration.
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Blend factor for `elapsed`, in `[0, 1]`. A zero duration is
    /// always complete.
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Whether `elapsed` has reached the end of the fade.
    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    /// The blended frame at `elapsed`.
    pub fn frame_at(&self, elapsed: Duration) -> BufferSnapshot {
        BufferSnapshot::blend(&self.from, &self.to, self.progress(elapsed))
    }
}
