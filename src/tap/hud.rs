//! The display-side model: what the screen shows between engine updates.
//!
//! `Hud` implements [`DisplaySink`] (through [`SharedHud`]) and owns all
//! purely visual state: notices, the combo indicator and tap sparks.

use std::cell::RefCell;
use std::rc::Rc;

use super::display::{DisplayEvent, DisplaySink, Projection, TapPoint};
use super::logic::format_btc;

/// How long a notice stays on screen.
pub const NOTICE_MS: f64 = 3_000.0;

/// Most notices shown at once.
const MAX_NOTICES: usize = 4;

/// Sparks per tap.
const SPARKS_PER_BURST: usize = 5;

/// Cap on live sparks.
const MAX_SPARKS: usize = 40;

/// Approximate cell size in pixels, for converting spark travel.
const CELL_W_PX: f64 = 8.0;
const CELL_H_PX: f64 = 15.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub text: String,
    pub age_ms: f64,
}

/// A single particle flying away from the tap point.
#[derive(Clone, Debug, PartialEq)]
pub struct Spark {
    pub origin: Option<TapPoint>,
    /// Travel at end of life, in cells.
    pub dx: f64,
    pub dy: f64,
    pub life_ms: f64,
    pub age_ms: f64,
    /// Alternates gold / orange.
    pub gold: bool,
}

impl Spark {
    /// 0.0 at birth, 1.0 at death.
    pub fn progress(&self) -> f64 {
        (self.age_ms / self.life_ms).clamp(0.0, 1.0)
    }

    /// Current offset from the origin, in whole cells.
    pub fn offset(&self) -> (i32, i32) {
        let p = self.progress();
        ((self.dx * p).round() as i32, (self.dy * p).round() as i32)
    }
}

pub struct Hud {
    pub projection: Option<Projection>,
    /// `(streak, bonus_percent)` while the combo indicator is shown.
    pub combo: Option<(u32, u32)>,
    pub notices: Vec<Notice>,
    pub sparks: Vec<Spark>,
    /// Last credited tap value, shown next to the coin.
    pub last_tap: Option<f64>,
    /// Remaining coin "pressed" flash.
    pub tap_flash_ms: f64,
    rng_state: u32,
}

impl Hud {
    pub fn new() -> Self {
        Self {
            projection: None,
            combo: None,
            notices: Vec::new(),
            sparks: Vec::new(),
            last_tap: None,
            tap_flash_ms: 0.0,
            rng_state: 0x9E37_79B9,
        }
    }

    /// Age everything by `elapsed_ms` and drop what has expired.
    pub fn advance(&mut self, elapsed_ms: f64) {
        if elapsed_ms <= 0.0 {
            return;
        }
        for n in &mut self.notices {
            n.age_ms += elapsed_ms;
        }
        self.notices.retain(|n| n.age_ms < NOTICE_MS);
        for s in &mut self.sparks {
            s.age_ms += elapsed_ms;
        }
        self.sparks.retain(|s| s.age_ms < s.life_ms);
        self.tap_flash_ms = (self.tap_flash_ms - elapsed_ms).max(0.0);
    }

    pub fn push_notice(&mut self, text: String) {
        self.notices.push(Notice { text, age_ms: 0.0 });
        if self.notices.len() > MAX_NOTICES {
            self.notices.remove(0);
        }
    }

    /// xorshift32.
    fn next_random(&mut self) -> u32 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        x
    }

    fn spawn_burst(&mut self, origin: Option<TapPoint>) {
        for i in 0..SPARKS_PER_BURST {
            let angle = (self.next_random() % 360) as f64 * std::f64::consts::PI / 180.0;
            let distance_px = 50.0 + (self.next_random() % 101) as f64;
            let life_ms = 500.0 + (self.next_random() % 501) as f64;
            self.sparks.push(Spark {
                origin,
                dx: angle.cos() * distance_px / CELL_W_PX,
                dy: angle.sin() * distance_px / CELL_H_PX,
                life_ms,
                age_ms: 0.0,
                gold: i % 2 == 0,
            });
        }
        if self.sparks.len() > MAX_SPARKS {
            let excess = self.sparks.len() - MAX_SPARKS;
            self.sparks.drain(..excess);
        }
    }
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for Hud {
    fn render(&mut self, projection: &Projection) {
        self.projection = Some(projection.clone());
    }

    fn notify(&mut self, event: DisplayEvent) {
        match event {
            DisplayEvent::Burst { at, value } => {
                self.last_tap = Some(value);
                self.tap_flash_ms = 150.0;
                self.spawn_burst(at);
            }
            DisplayEvent::ComboActive {
                streak,
                bonus_percent,
            } => self.combo = Some((streak, bonus_percent)),
            DisplayEvent::ComboEnded => self.combo = None,
            DisplayEvent::AchievementUnlocked(id) => self.push_notice(format!(
                "{} Achievement unlocked: {}!",
                id.medal(),
                id.name()
            )),
            DisplayEvent::Saved => self.push_notice("💾 Game saved!".into()),
        }
    }
}

/// Handle the engine writes through while the renderer reads the same `Hud`.
#[derive(Clone)]
pub struct SharedHud(pub Rc<RefCell<Hud>>);

impl DisplaySink for SharedHud {
    fn render(&mut self, projection: &Projection) {
        self.0.borrow_mut().render(projection);
    }

    fn notify(&mut self, event: DisplayEvent) {
        self.0.borrow_mut().notify(event);
    }
}

/// Combo indicator text, e.g. "Combo x7! +20%".
pub fn combo_label(streak: u32, bonus_percent: u32) -> String {
    format!("Combo x{}! +{}%", streak, bonus_percent)
}

/// Tap feedback text, e.g. "+0.00000002".
pub fn tap_label(value: f64) -> String {
    format!("+{}", format_btc(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tap::state::{AchievementId, GameState};

    #[test]
    fn render_stores_projection() {
        let mut hud = Hud::new();
        let p = Projection::of(&GameState::new());
        hud.render(&p);
        assert_eq!(hud.projection, Some(p));
    }

    #[test]
    fn combo_shows_and_hides() {
        let mut hud = Hud::new();
        hud.notify(DisplayEvent::combo(7));
        assert_eq!(hud.combo, Some((7, 20)));
        assert_eq!(combo_label(7, 20), "Combo x7! +20%");
        hud.notify(DisplayEvent::ComboEnded);
        assert_eq!(hud.combo, None);
    }

    #[test]
    fn achievement_notice_expires() {
        let mut hud = Hud::new();
        hud.notify(DisplayEvent::AchievementUnlocked(AchievementId::FirstBitcoin));
        assert_eq!(hud.notices.len(), 1);
        assert!(hud.notices[0].text.contains("First Bitcoin"));
        hud.advance(NOTICE_MS - 1.0);
        assert_eq!(hud.notices.len(), 1);
        hud.advance(1.0);
        assert!(hud.notices.is_empty());
    }

    #[test]
    fn notices_are_capped() {
        let mut hud = Hud::new();
        for _ in 0..10 {
            hud.notify(DisplayEvent::Saved);
        }
        assert_eq!(hud.notices.len(), MAX_NOTICES);
    }

    #[test]
    fn burst_spawns_sparks_within_ranges() {
        let mut hud = Hud::new();
        hud.notify(DisplayEvent::Burst { at: None, value: 1.0 });
        assert_eq!(hud.sparks.len(), SPARKS_PER_BURST);
        assert_eq!(hud.last_tap, Some(1.0));
        for s in &hud.sparks {
            assert!(s.life_ms >= 500.0 && s.life_ms <= 1_000.0);
            let px = ((s.dx * CELL_W_PX).powi(2) + (s.dy * CELL_H_PX).powi(2)).sqrt();
            assert!(px >= 49.9 && px <= 150.1, "distance {}", px);
        }
        assert!(hud.sparks[0].gold && !hud.sparks[1].gold);
    }

    #[test]
    fn sparks_die_and_are_capped() {
        let mut hud = Hud::new();
        for _ in 0..20 {
            hud.notify(DisplayEvent::Burst { at: None, value: 1.0 });
        }
        assert_eq!(hud.sparks.len(), MAX_SPARKS);
        hud.advance(1_000.0);
        assert!(hud.sparks.is_empty());
    }

    #[test]
    fn spark_offset_grows_to_full_travel() {
        let spark = Spark {
            origin: None,
            dx: 10.0,
            dy: -4.0,
            life_ms: 1_000.0,
            age_ms: 500.0,
            gold: true,
        };
        assert_eq!(spark.offset(), (5, -2));
        let done = Spark { age_ms: 2_000.0, ..spark };
        assert_eq!(done.offset(), (10, -4));
    }

    #[test]
    fn shared_hud_writes_through() {
        let hud = Rc::new(RefCell::new(Hud::new()));
        let mut sink = SharedHud(hud.clone());
        sink.notify(DisplayEvent::Saved);
        assert_eq!(hud.borrow().notices.len(), 1);
    }

    #[test]
    fn tap_label_formats_amount() {
        assert_eq!(tap_label(2.0), "+0.00000002");
    }
}
