//! Host-clock bookkeeping for simulated delays.
//!
//! The browser calls `Session::update(now_ms)` every frame with
//! `performance.now()`. [`Clock`] turns those timestamps into clamped
//! deltas, and [`Timer`]s count the deltas down: mock store latency and
//! the short pause before the week summary is shown.

/// Frames further apart than this (backgrounded tab) count as this long.
const MAX_FRAME_DELTA_MS: f64 = 500.0;

/// Delay before the week summary appears, so the view can re-read state.
pub const SUMMARY_DELAY_MS: f64 = 100.0;

#[derive(Clone, Debug, Default)]
pub struct Clock {
    /// Total simulated milliseconds since creation.
    pub elapsed_ms: f64,
    last_timestamp: Option<f64>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a wall-clock timestamp. Returns the clamped delta since the
    /// previous call (0 on the first call or when time runs backwards).
    pub fn update(&mut self, now_ms: f64) -> f64 {
        let delta = match self.last_timestamp {
            Some(prev) if now_ms.is_finite() => (now_ms - prev).clamp(0.0, MAX_FRAME_DELTA_MS),
            _ => 0.0,
        };
        if now_ms.is_finite() {
            self.last_timestamp = Some(now_ms);
        }
        self.elapsed_ms += delta;
        delta
    }
}

/// One-shot countdown.
#[derive(Clone, Debug, PartialEq)]
pub struct Timer {
    remaining_ms: f64,
}

impl Timer {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            remaining_ms: duration_ms.max(0.0),
        }
    }

    /// Count down by `delta_ms`. Returns true once the timer has fired.
    pub fn advance(&mut self, delta_ms: f64) -> bool {
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.remaining_ms = (self.remaining_ms - delta_ms).max(0.0);
        }
        self.is_done()
    }

    pub fn is_done(&self) -> bool {
        self.remaining_ms <= 0.0
    }

    pub fn remaining_ms(&self) -> f64 {
        self.remaining_ms
    }
}
