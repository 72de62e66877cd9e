//! Bitcoin Tap game logic: pure functions over `GameState`.

use super::combo;
use super::state::{AchievementId, GameState, UpgradeKind, ACHIEVEMENTS, RATE_STEP, SATS_PER_COIN};

/// Value of one tap at the given streak.
pub fn tap_value(state: &GameState, streak: u32) -> f64 {
    state.effective_per_tap() * combo::bonus_factor(streak)
}

/// Credit one tap. Returns the amount earned.
pub fn apply_tap(state: &mut GameState, streak: u32) -> f64 {
    let value = tap_value(state, streak);
    state.balance += value;
    value
}

/// One second of passive income. Returns false when there is none.
pub fn tick(state: &mut GameState) -> bool {
    if state.per_second <= 0.0 {
        return false;
    }
    state.balance += state.effective_per_second();
    true
}

/// Try to buy one level of an upgrade. Returns true if successful.
pub fn buy_upgrade(state: &mut GameState, kind: UpgradeKind) -> bool {
    let cost = state.upgrade(kind).cost();
    if state.balance < cost {
        return false;
    }

    state.balance = (state.balance - cost).max(0.0);
    state.upgrade_mut(kind).level += 1;
    match kind {
        UpgradeKind::Click => state.base_per_tap += RATE_STEP,
        UpgradeKind::Auto => state.per_second += RATE_STEP,
        UpgradeKind::Multiplier => state.multiplier = state.multiplier.saturating_mul(2),
    }
    true
}

/// Unlock every achievement whose threshold the balance has reached.
/// Returns the newly unlocked ids in threshold order.
pub fn check_achievements(state: &mut GameState) -> Vec<AchievementId> {
    let mut unlocked = Vec::new();
    for achievement in ACHIEVEMENTS {
        if state.is_unlocked(achievement.id) {
            continue;
        }
        if state.balance >= achievement.threshold {
            state.achievements.insert(achievement.id);
            unlocked.push(achievement.id);
        }
    }
    unlocked
}

/// Format satoshis as a coin amount with 8 decimals (e.g. 150 → "0.00000150").
pub fn format_btc(sats: f64) -> String {
    format!("{:.8}", sats / SATS_PER_COIN)
}
