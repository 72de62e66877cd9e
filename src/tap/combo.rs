//! Tap streak tracking with a single cancelable expiry deadline.
//!
//! The expiry is stored as one `Option<f64>` deadline, so scheduling a new
//! expiry replaces (cancels) the previous one. Nothing else can fire it.

/// Taps closer together than this extend the streak.
pub const COMBO_WINDOW_MS: f64 = 500.0;

/// The streak resets this long after the last tap.
pub const COMBO_EXPIRY_MS: f64 = 1_000.0;

/// Streak length above which taps earn a bonus.
pub const COMBO_BONUS_START: u32 = 5;

/// Bonus per streak step above `COMBO_BONUS_START`.
pub const COMBO_BONUS_STEP: f64 = 0.1;

/// Streak length from which the display shows the combo indicator.
pub const COMBO_DISPLAY_MIN: u32 = 5;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComboTracker {
    streak: u32,
    last_tap_ms: Option<f64>,
    expires_at: Option<f64>,
}

impl ComboTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[cfg(test)]
    pub fn expires_at(&self) -> Option<f64> {
        self.expires_at
    }

    /// Record a tap at `now_ms` and reschedule the expiry.
    /// Returns true if the tap extended an existing streak.
    pub fn register_tap(&mut self, now_ms: f64) -> bool {
        let extended = match self.last_tap_ms {
            Some(prev) => now_ms - prev < COMBO_WINDOW_MS,
            None => false,
        };
        if extended {
            self.streak = self.streak.saturating_add(1);
        } else {
            self.streak = 1;
        }
        self.last_tap_ms = Some(now_ms);
        self.expires_at = Some(now_ms + COMBO_EXPIRY_MS);
        extended
    }

    /// Fire the pending expiry if its deadline has passed.
    /// Returns true exactly once per scheduled expiry.
    pub fn poll_expiry(&mut self, now_ms: f64) -> bool {
        match self.expires_at {
            Some(deadline) if now_ms >= deadline => {
                self.streak = 0;
                self.expires_at = None;
                true
            }
            _ => false,
        }
    }
}

/// `1 + (streak - 5) * 0.1` above the start, 1 otherwise.
pub fn bonus_factor(streak: u32) -> f64 {
    if streak > COMBO_BONUS_START {
        1.0 + (streak - COMBO_BONUS_START) as f64 * COMBO_BONUS_STEP
    } else {
        1.0
    }
}

/// Bonus as a whole percentage, for display.
pub fn bonus_percent(streak: u32) -> u32 {
    streak.saturating_sub(COMBO_BONUS_START) * 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tap_starts_streak() {
        let mut c = ComboTracker::new();
        assert!(!c.register_tap(10_000.0));
        assert_eq!(c.streak(), 1);
        assert_eq!(c.expires_at(), Some(11_000.0));
    }

    #[test]
    fn fast_taps_extend() {
        let mut c = ComboTracker::new();
        c.register_tap(0.0);
        assert!(c.register_tap(499.0));
        assert!(c.register_tap(998.0));
        assert_eq!(c.streak(), 3);
    }

    #[test]
    fn slow_tap_restarts() {
        let mut c = ComboTracker::new();
        c.register_tap(0.0);
        c.register_tap(100.0);
        assert!(!c.register_tap(600.0));
        assert_eq!(c.streak(), 1);
    }

    #[test]
    fn exactly_window_is_slow() {
        let mut c = ComboTracker::new();
        c.register_tap(0.0);
        c.register_tap(500.0);
        assert_eq!(c.streak(), 1);
    }

    #[test]
    fn expiry_fires_once_at_deadline() {
        let mut c = ComboTracker::new();
        c.register_tap(0.0);
        c.register_tap(200.0);
        assert!(!c.poll_expiry(1_199.0));
        assert_eq!(c.streak(), 2);
        assert!(c.poll_expiry(1_200.0));
        assert_eq!(c.streak(), 0);
        assert!(!c.poll_expiry(5_000.0));
    }

    #[test]
    fn rescheduling_cancels_previous_expiry() {
        let mut c = ComboTracker::new();
        c.register_tap(0.0);
        c.register_tap(400.0);
        // The first deadline (1000) must not fire mid-streak.
        assert!(!c.poll_expiry(1_000.0));
        assert_eq!(c.streak(), 2);
        assert!(c.poll_expiry(1_400.0));
    }

    #[test]
    fn tap_after_expiry_starts_fresh() {
        let mut c = ComboTracker::new();
        c.register_tap(0.0);
        c.poll_expiry(1_000.0);
        c.register_tap(1_100.0);
        assert_eq!(c.streak(), 1);
    }

    #[test]
    fn bonus_factor_table() {
        assert_eq!(bonus_factor(0), 1.0);
        assert_eq!(bonus_factor(5), 1.0);
        assert!((bonus_factor(6) - 1.1).abs() < 1e-12);
        assert!((bonus_factor(15) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn bonus_percent_table() {
        assert_eq!(bonus_percent(3), 0);
        assert_eq!(bonus_percent(5), 0);
        assert_eq!(bonus_percent(8), 30);
    }
}
