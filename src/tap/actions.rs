//! Semantic action IDs for Bitcoin Tap click targets.
//!
//! Registered during render and dispatched via `InputEvent::Click`.

// ── Core ────────────────────────────────────────────────────────
pub const TAP_COIN: u16 = 0;

// ── Upgrade purchase (base + UpgradeKind::index) ────────────────
pub const BUY_UPGRADE_BASE: u16 = 100;

// ── Session ─────────────────────────────────────────────────────
pub const SAVE_GAME: u16 = 200;
pub const RESET_GAME: u16 = 201;

// ── Reset dialog ────────────────────────────────────────────────
pub const CONFIRM_RESET: u16 = 300;
pub const CANCEL_RESET: u16 = 301;
/// Backdrop behind the dialog; swallows clicks.
pub const DIALOG_BACKDROP: u16 = 399;
