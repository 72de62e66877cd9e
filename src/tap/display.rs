//! Read model and event types pushed from the engine to the display layer.
//!
//! The engine only ever writes through [`DisplaySink`]; it never reads from it.

use super::combo::bonus_percent;
use super::state::{AchievementId, GameState, UpgradeKind, ACHIEVEMENTS};

/// Where a tap landed, in terminal cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TapPoint {
    pub col: u16,
    pub row: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpgradeView {
    pub kind: UpgradeKind,
    pub level: u32,
    pub cost: f64,
    pub affordable: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AchievementView {
    pub id: AchievementId,
    pub threshold: f64,
    pub unlocked: bool,
}

/// Read-only snapshot of everything the display renders.
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    pub balance: f64,
    /// Effective per-tap income (multiplier applied, no combo).
    pub per_tap: f64,
    /// Effective per-second income.
    pub per_second: f64,
    pub multiplier: u64,
    pub upgrades: Vec<UpgradeView>,
    pub achievements: Vec<AchievementView>,
}

impl Projection {
    pub fn of(state: &GameState) -> Self {
        Self {
            balance: state.balance,
            per_tap: state.effective_per_tap(),
            per_second: state.effective_per_second(),
            multiplier: state.multiplier,
            upgrades: state
                .upgrades
                .iter()
                .map(|u| UpgradeView {
                    kind: u.kind,
                    level: u.level,
                    cost: u.cost(),
                    affordable: state.balance >= u.cost(),
                })
                .collect(),
            achievements: ACHIEVEMENTS
                .iter()
                .map(|a| AchievementView {
                    id: a.id,
                    threshold: a.threshold,
                    unlocked: state.is_unlocked(a.id),
                })
                .collect(),
        }
    }

    #[cfg(test)]
    pub fn upgrade(&self, kind: UpgradeKind) -> Option<&UpgradeView> {
        self.upgrades.iter().find(|u| u.kind == kind)
    }
}

/// One-shot notifications.
#[derive(Clone, Debug, PartialEq)]
pub enum DisplayEvent {
    /// A tap credited `value`; purely visual.
    Burst { at: Option<TapPoint>, value: f64 },
    /// A fast streak is running.
    ComboActive { streak: u32, bonus_percent: u32 },
    /// The streak expired.
    ComboEnded,
    AchievementUnlocked(AchievementId),
    /// A manual save went through.
    Saved,
}

impl DisplayEvent {
    pub fn combo(streak: u32) -> Self {
        DisplayEvent::ComboActive {
            streak,
            bonus_percent: bonus_percent(streak),
        }
    }
}

/// Rendering surface the engine pushes into.
pub trait DisplaySink {
    /// Redraw from a fresh projection.
    fn render(&mut self, projection: &Projection);

    /// Deliver a one-shot notification.
    fn notify(&mut self, event: DisplayEvent);
}

#[cfg(test)]
pub mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// Sink that records everything, shareable with the test body.
    #[derive(Clone, Default)]
    pub struct RecordingSink {
        pub renders: Rc<RefCell<Vec<Projection>>>,
        pub events: Rc<RefCell<Vec<DisplayEvent>>>,
    }

    impl RecordingSink {
        pub fn render_count(&self) -> usize {
            self.renders.borrow().len()
        }

        pub fn last_render(&self) -> Option<Projection> {
            self.renders.borrow().last().cloned()
        }

        pub fn take_events(&self) -> Vec<DisplayEvent> {
            std::mem::take(&mut *self.events.borrow_mut())
        }
    }

    impl DisplaySink for RecordingSink {
        fn render(&mut self, projection: &Projection) {
            self.renders.borrow_mut().push(projection.clone());
        }

        fn notify(&mut self, event: DisplayEvent) {
            self.events.borrow_mut().push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_marks_affordability() {
        let mut state = GameState::new();
        state.balance = 150.0;
        let p = Projection::of(&state);
        assert!(p.upgrade(UpgradeKind::Click).unwrap().affordable);
        assert!(p.upgrade(UpgradeKind::Auto).unwrap().affordable);
        assert!(!p.upgrade(UpgradeKind::Multiplier).unwrap().affordable);
    }

    #[test]
    fn projection_lists_all_achievements() {
        let mut state = GameState::new();
        state.achievements.insert(AchievementId::CryptoEnthusiast);
        let p = Projection::of(&state);
        assert_eq!(p.achievements.len(), ACHIEVEMENTS.len());
        let unlocked: Vec<_> = p.achievements.iter().filter(|a| a.unlocked).map(|a| a.id).collect();
        assert_eq!(unlocked, vec![AchievementId::CryptoEnthusiast]);
    }

    #[test]
    fn projection_uses_effective_rates() {
        let mut state = GameState::new();
        state.multiplier = 8;
        state.per_second = 2.0;
        let p = Projection::of(&state);
        assert_eq!(p.per_tap, 8.0);
        assert_eq!(p.per_second, 16.0);
    }

    #[test]
    fn combo_event_carries_bonus() {
        assert_eq!(
            DisplayEvent::combo(9),
            DisplayEvent::ComboActive { streak: 9, bonus_percent: 40 }
        );
    }
}
