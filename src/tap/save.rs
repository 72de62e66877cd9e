//! Bitcoin Tap save/load.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: current snapshot format. Bump when fields are added.
//! - Every field is read on its own: a missing or malformed field falls back
//!   to its default while the rest of the snapshot is kept. Unknown fields are
//!   ignored, so snapshots from other versions load as far as they can.
//! - Upgrade costs are never written; they are recomputed from levels.

use std::cell::RefCell;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::state::{AchievementId, GameState, UpgradeKind};
use crate::log;

/// Snapshot format version.
pub const SAVE_VERSION: u32 = 1;

/// localStorage key of the single snapshot entry.
pub const STORAGE_KEY: &str = "bitcoinTapGame";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("local storage is not available")]
    Unavailable,
    #[error("failed to read snapshot: {0}")]
    Read(String),
    #[error("failed to write snapshot: {0}")]
    Write(String),
    #[error("failed to encode snapshot: {0}")]
    Encode(String),
}

/// A single named key-value entry holding the snapshot.
pub trait SaveStore {
    fn load(&self) -> Result<Option<String>, StoreError>;
    fn store(&mut self, snapshot: &str) -> Result<(), StoreError>;
}

/// Deserialize a field, turning a malformed value into `None`.
fn lenient<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(de)?;
    Ok(T::deserialize(value).ok())
}

#[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
struct UpgradeLevels {
    #[serde(default, deserialize_with = "lenient")]
    click: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    auto: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    multiplier: Option<u32>,
}

impl UpgradeLevels {
    fn get(&self, kind: UpgradeKind) -> Option<u32> {
        match kind {
            UpgradeKind::Click => self.click,
            UpgradeKind::Auto => self.auto,
            UpgradeKind::Multiplier => self.multiplier,
        }
    }
}

/// Serialized snapshot. Transient combo state is not included.
#[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
struct SaveData {
    #[serde(default, deserialize_with = "lenient")]
    version: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    balance: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    base_per_tap: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    per_second: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    multiplier: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    upgrades: Option<UpgradeLevels>,
    /// Achievement keys; unknown keys are dropped.
    #[serde(default, deserialize_with = "lenient")]
    achievements: Option<Vec<serde_json::Value>>,
}

/// JSON has no infinity: an overflowed amount is written as `f64::MAX`
/// instead of `null`.
fn storable(amount: f64) -> f64 {
    if amount.is_nan() {
        0.0
    } else {
        amount.clamp(f64::MIN, f64::MAX)
    }
}

fn extract_save(state: &GameState) -> SaveData {
    SaveData {
        version: Some(SAVE_VERSION),
        balance: Some(storable(state.balance)),
        base_per_tap: Some(storable(state.base_per_tap)),
        per_second: Some(storable(state.per_second)),
        multiplier: Some(state.multiplier),
        upgrades: Some(UpgradeLevels {
            click: Some(state.upgrade(UpgradeKind::Click).level),
            auto: Some(state.upgrade(UpgradeKind::Auto).level),
            multiplier: Some(state.upgrade(UpgradeKind::Multiplier).level),
        }),
        achievements: Some(
            state
                .achievements
                .iter()
                .map(|id| serde_json::Value::from(id.key()))
                .collect(),
        ),
    }
}

/// Build a state from a snapshot, defaulting each unusable field on its own.
/// Returns the state and the number of fields that had to be defaulted.
fn apply_save(save: &SaveData) -> (GameState, usize) {
    let mut state = GameState::new();
    let mut defaulted = 0;

    let mut take = |value: Option<f64>, min: f64| -> Option<f64> {
        let v = value.filter(|v| v.is_finite() && *v >= min);
        if v.is_none() {
            defaulted += 1;
        }
        v
    };
    if let Some(v) = take(save.balance, 0.0) {
        state.balance = v;
    }
    if let Some(v) = take(save.base_per_tap, f64::MIN_POSITIVE) {
        state.base_per_tap = v;
    }
    if let Some(v) = take(save.per_second, 0.0) {
        state.per_second = v;
    }

    match save.multiplier.filter(|m| *m >= 1) {
        Some(m) => state.multiplier = m,
        None => defaulted += 1,
    }

    let levels = save.upgrades.as_ref();
    if levels.is_none() {
        defaulted += 1;
    }
    for kind in UpgradeKind::all() {
        let level = levels
            .and_then(|l| l.get(*kind))
            .filter(|level| *level >= kind.initial_level());
        match level {
            Some(level) => state.upgrade_mut(*kind).level = level,
            None if levels.is_some() => defaulted += 1,
            None => {}
        }
    }

    match &save.achievements {
        Some(keys) => {
            state.achievements = keys
                .iter()
                .filter_map(|k| k.as_str())
                .filter_map(AchievementId::from_key)
                .collect();
        }
        None => defaulted += 1,
    }

    (state, defaulted)
}

/// Encode a state as a snapshot string.
pub fn encode(state: &GameState) -> Result<String, StoreError> {
    serde_json::to_string(&extract_save(state)).map_err(|e| StoreError::Encode(e.to_string()))
}

/// Decode a snapshot. Returns None only when it is not a JSON object at all;
/// anything object-shaped yields a state with bad fields defaulted.
pub fn decode(snapshot: &str) -> Option<GameState> {
    let save: SaveData = match serde_json::from_str(snapshot) {
        Ok(s) => s,
        Err(e) => {
            log::warn(&format!("Bitcoin Tap: unreadable save data, discarding: {e}"));
            return None;
        }
    };

    match save.version {
        Some(v) if v == SAVE_VERSION => {}
        Some(v) => log::info(&format!(
            "Bitcoin Tap: loading save version {v} (current {SAVE_VERSION})"
        )),
        None => log::info("Bitcoin Tap: save has no version, loading leniently"),
    }

    let (state, defaulted) = apply_save(&save);
    if defaulted > 0 {
        log::warn(&format!(
            "Bitcoin Tap: {defaulted} save field(s) missing or malformed, defaults used"
        ));
    }
    Some(state)
}

/// In-memory store. Clones share the same slot.
#[derive(Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<String>>>,
    fail_writes: Rc<RefCell<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: &str) -> Self {
        let store = Self::default();
        *store.slot.borrow_mut() = Some(snapshot.to_string());
        store
    }

    pub fn snapshot(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    /// Make subsequent writes fail (for exercising the failure path).
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.borrow_mut() = fail;
    }
}

impl SaveStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot.borrow().clone())
    }

    fn store(&mut self, snapshot: &str) -> Result<(), StoreError> {
        if *self.fail_writes.borrow() {
            return Err(StoreError::Write("quota exceeded".into()));
        }
        *self.slot.borrow_mut() = Some(snapshot.to_string());
        Ok(())
    }
}

/// Browser localStorage entry.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    key: &'static str,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn new(key: &'static str) -> Self {
        Self { key }
    }

    fn storage(&self) -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl SaveStore for LocalStorage {
    fn load(&self) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(self.key)
            .map_err(|e| StoreError::Read(format!("{e:?}")))
    }

    fn store(&mut self, snapshot: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(self.key, snapshot)
            .map_err(|e| StoreError::Write(format!("{e:?}")))
    }
}

/// The store a browser session persists to.
#[cfg(target_arch = "wasm32")]
pub fn session_store() -> Box<dyn SaveStore> {
    Box::new(LocalStorage::new(STORAGE_KEY))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn session_store() -> Box<dyn SaveStore> {
    Box::new(MemoryStore::new())
}
