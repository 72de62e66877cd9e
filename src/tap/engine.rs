//! The idle game engine: sole owner of `GameState`.
//!
//! Every mutation goes through one of the operations below, which then push a
//! fresh projection to the display sink and persist the snapshot. Persistence
//! failures are logged and otherwise ignored; in-memory state stays
//! authoritative for the session.

use super::combo::{ComboTracker, COMBO_DISPLAY_MIN};
use super::display::{DisplayEvent, DisplaySink, Projection, TapPoint};
use super::logic;
use super::save::{self, SaveStore};
use super::state::{GameState, UpgradeKind};
use crate::log;

/// Caller's answer to "reset all progress?".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

pub struct TapEngine {
    state: GameState,
    combo: ComboTracker,
    store: Box<dyn SaveStore>,
    sink: Box<dyn DisplaySink>,
}

impl TapEngine {
    /// Start a session from the stored snapshot, or from defaults.
    /// An unreadable snapshot is left in place; the next persist overwrites it.
    pub fn load(store: Box<dyn SaveStore>, sink: Box<dyn DisplaySink>) -> Self {
        let state = match store.load() {
            Ok(Some(snapshot)) => save::decode(&snapshot).unwrap_or_default(),
            Ok(None) => GameState::new(),
            Err(e) => {
                log::warn(&format!("Bitcoin Tap: {e}; starting fresh"));
                GameState::new()
            }
        };

        let mut engine = Self {
            state,
            combo: ComboTracker::new(),
            store,
            sink,
        };
        engine.render();
        engine
    }

    /// Read-only view of the current state.
    #[cfg(test)]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub fn projection(&self) -> Projection {
        Projection::of(&self.state)
    }

    #[cfg(test)]
    pub fn combo(&self) -> u32 {
        self.combo.streak()
    }

    /// Handle a tap at `now_ms`. Returns the amount credited.
    pub fn tap(&mut self, now_ms: f64, at: Option<TapPoint>) -> f64 {
        // An expiry that fell due since the last frame fires before the new
        // tap reschedules it.
        self.poll(now_ms);
        let extended = self.combo.register_tap(now_ms);
        let streak = self.combo.streak();
        if extended && streak >= COMBO_DISPLAY_MIN {
            self.sink.notify(DisplayEvent::combo(streak));
        }

        let value = logic::apply_tap(&mut self.state, streak);
        self.sink.notify(DisplayEvent::Burst { at, value });

        self.evaluate();
        self.render();
        self.persist();
        value
    }

    /// Fire the combo expiry if it is due. Call this regularly.
    pub fn poll(&mut self, now_ms: f64) {
        if self.combo.poll_expiry(now_ms) {
            self.sink.notify(DisplayEvent::ComboEnded);
        }
    }

    /// One second of passive income. No-op (no render, no save) when idle.
    pub fn tick(&mut self) -> bool {
        if !logic::tick(&mut self.state) {
            return false;
        }
        self.evaluate();
        self.render();
        self.persist();
        true
    }

    /// Buy one level. Silently does nothing if the balance is short.
    pub fn buy_upgrade(&mut self, kind: UpgradeKind) -> bool {
        if !logic::buy_upgrade(&mut self.state, kind) {
            return false;
        }
        self.render();
        self.persist();
        true
    }

    /// Wipe all progress, achievements included, once confirmed.
    pub fn reset(&mut self, confirmation: Confirmation) -> bool {
        if confirmation != Confirmation::Confirmed {
            return false;
        }
        self.state = GameState::new();
        log::info("Bitcoin Tap: progress reset");
        self.render();
        self.persist();
        true
    }

    /// Persist immediately and tell the display.
    pub fn save_now(&mut self) -> bool {
        let saved = self.persist();
        if saved {
            self.sink.notify(DisplayEvent::Saved);
        }
        saved
    }

    /// Unlock reached achievements, notifying once per unlock.
    fn evaluate(&mut self) {
        for id in logic::check_achievements(&mut self.state) {
            self.sink.notify(DisplayEvent::AchievementUnlocked(id));
        }
    }

    fn render(&mut self) {
        let projection = Projection::of(&self.state);
        self.sink.render(&projection);
    }

    fn persist(&mut self) -> bool {
        let result = save::encode(&self.state).and_then(|json| self.store.store(&json));
        match result {
            Ok(()) => true,
            Err(e) => {
                log::warn(&format!("Bitcoin Tap: {e}"));
                false
            }
        }
    }
}
