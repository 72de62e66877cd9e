//! Fixed-interval ticker using an accumulator.
//!
//! `draw_web()` calls at ~60fps with variable delta. `Ticker` turns frame
//! timestamps into whole intervals (one per second for the income tick), so
//! game logic stays deterministic and testable.

/// Income tick interval.
pub const TICK_INTERVAL_MS: f64 = 1_000.0;

/// Largest frame gap honoured; longer gaps (backgrounded tab) are cut to this.
pub const MAX_CATCH_UP_MS: f64 = 60_000.0;

pub struct Ticker {
    interval_ms: f64,
    /// Milliseconds not yet consumed as ticks.
    accumulator: f64,
    /// Ticks emitted since creation.
    pub total_ticks: u64,
    last_timestamp: Option<f64>,
    last_delta: f64,
}

impl Ticker {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
            last_delta: 0.0,
        }
    }

    /// Feed a frame timestamp (from `performance.now()`).
    /// Returns the number of whole intervals that elapsed.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_CATCH_UP_MS),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);
        self.last_delta = delta;

        self.accumulator += delta;
        let ticks = (self.accumulator / self.interval_ms) as u32;
        self.accumulator -= ticks as f64 * self.interval_ms;
        self.total_ticks += ticks as u64;
        ticks
    }

    /// Clamped delta of the last `update`, in ms.
    pub fn last_delta(&self) -> f64 {
        self.last_delta
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(TICK_INTERVAL_MS)
    }
}
