//! Bitcoin Tap: tap a coin for satoshis, buy upgrades, idle for income.

pub mod actions;
pub mod combo;
pub mod display;
pub mod engine;
pub mod hud;
pub mod logic;
pub mod render;
pub mod save;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};
use crate::time::Ticker;

use actions::*;
use display::TapPoint;
use engine::{Confirmation, TapEngine};
use hud::{Hud, SharedHud};
use save::SaveStore;
use state::UpgradeKind;

/// One play session: the engine, the screen model it writes to, and the
/// reset dialog.
pub struct TapGame {
    engine: TapEngine,
    hud: Rc<RefCell<Hud>>,
    confirm_reset: bool,
    ticker: Ticker,
}

impl TapGame {
    pub fn new() -> Self {
        Self::with_store(save::session_store())
    }

    pub fn with_store(store: Box<dyn SaveStore>) -> Self {
        let hud = Rc::new(RefCell::new(Hud::new()));
        let engine = TapEngine::load(store, Box::new(SharedHud(hud.clone())));
        Self {
            engine,
            hud,
            confirm_reset: false,
            ticker: Ticker::default(),
        }
    }

    #[cfg(test)]
    pub fn engine(&self) -> &TapEngine {
        &self.engine
    }

    pub fn is_confirming_reset(&self) -> bool {
        self.confirm_reset
    }

    /// Dispatch one input. Returns whether it was consumed.
    pub fn handle_input(&mut self, event: &InputEvent, now_ms: f64) -> bool {
        if self.confirm_reset {
            return self.handle_dialog_input(event);
        }

        match event {
            InputEvent::Key(' ') | InputEvent::Key('c') => {
                self.engine.tap(now_ms, None);
                true
            }
            InputEvent::Click {
                action_id: TAP_COIN,
                col,
                row,
            } => {
                self.engine.tap(now_ms, Some(TapPoint { col: *col, row: *row }));
                true
            }
            InputEvent::Key(c) => match upgrade_for_key(*c) {
                Some(kind) => {
                    self.engine.buy_upgrade(kind);
                    true
                }
                None => self.handle_session_action(match *c {
                    's' => SAVE_GAME,
                    'r' => RESET_GAME,
                    _ => return false,
                }),
            },
            InputEvent::Click { action_id, .. } => {
                let id = *action_id;
                if (BUY_UPGRADE_BASE..BUY_UPGRADE_BASE + UpgradeKind::all().len() as u16)
                    .contains(&id)
                {
                    let kind = UpgradeKind::all()[(id - BUY_UPGRADE_BASE) as usize];
                    self.engine.buy_upgrade(kind);
                    true
                } else {
                    self.handle_session_action(id)
                }
            }
        }
    }

    fn handle_session_action(&mut self, action_id: u16) -> bool {
        match action_id {
            SAVE_GAME => {
                self.engine.save_now();
                true
            }
            RESET_GAME => {
                self.confirm_reset = true;
                true
            }
            _ => false,
        }
    }

    /// While the reset dialog is open only its answers are accepted.
    fn handle_dialog_input(&mut self, event: &InputEvent) -> bool {
        let confirmation = match event {
            InputEvent::Key('y')
            | InputEvent::Click {
                action_id: CONFIRM_RESET,
                ..
            } => Confirmation::Confirmed,
            InputEvent::Key('n')
            | InputEvent::Click {
                action_id: CANCEL_RESET,
                ..
            } => Confirmation::Declined,
            _ => return false,
        };
        self.confirm_reset = false;
        self.engine.reset(confirmation);
        true
    }

    /// Advance to frame time `now_ms`: passive income, combo expiry, effects.
    pub fn update(&mut self, now_ms: f64) {
        for _ in 0..self.ticker.update(now_ms) {
            self.engine.tick();
        }
        self.engine.poll(now_ms);
        self.hud.borrow_mut().advance(self.ticker.last_delta());
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.hud.borrow(), self.is_confirming_reset(), f, area, click_state);
    }
}

fn upgrade_for_key(key: char) -> Option<UpgradeKind> {
    UpgradeKind::all().iter().copied().find(|k| k.key() == key)
}
