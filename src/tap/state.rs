/// Bitcoin Tap game state definitions.
///
/// All amounts are in satoshis (1 BTC = 100,000,000 sat) held as `f64`, so one
/// base unit is exactly `1.0` and whole-unit sums never drift.

use std::collections::BTreeSet;

/// Satoshis per displayed coin.
pub const SATS_PER_COIN: f64 = 100_000_000.0;

/// Currency earned per unmodified tap at the start of a game.
pub const DEFAULT_PER_TAP: f64 = 1.0;

/// One base unit added to a rate by a Click or Auto upgrade.
pub const RATE_STEP: f64 = 1.0;

/// Kinds of purchasable upgrades.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UpgradeKind {
    Click,
    Auto,
    Multiplier,
}

impl UpgradeKind {
    /// All upgrade kinds in display order.
    pub fn all() -> &'static [UpgradeKind] {
        &[UpgradeKind::Click, UpgradeKind::Auto, UpgradeKind::Multiplier]
    }

    pub fn index(&self) -> usize {
        match self {
            UpgradeKind::Click => 0,
            UpgradeKind::Auto => 1,
            UpgradeKind::Multiplier => 2,
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            UpgradeKind::Click => "Better Pickaxe",
            UpgradeKind::Auto => "Mining Rig",
            UpgradeKind::Multiplier => "Hash Multiplier",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UpgradeKind::Click => "+0.00000001 BTC per tap",
            UpgradeKind::Auto => "+0.00000001 BTC per second",
            UpgradeKind::Multiplier => "x2 all income",
        }
    }

    /// Key that buys this upgrade.
    pub fn key(&self) -> char {
        match self {
            UpgradeKind::Click => '1',
            UpgradeKind::Auto => '2',
            UpgradeKind::Multiplier => '3',
        }
    }

    /// Cost of the first purchase, in satoshis.
    pub fn base_cost(&self) -> f64 {
        match self {
            UpgradeKind::Click => 10.0,
            UpgradeKind::Auto => 100.0,
            UpgradeKind::Multiplier => 1_000.0,
        }
    }

    /// Per-level growth factor of the cost curve.
    pub fn growth(&self) -> f64 {
        match self {
            UpgradeKind::Click => 1.5,
            UpgradeKind::Auto => 1.8,
            UpgradeKind::Multiplier => 3.0,
        }
    }

    /// Level a fresh game starts at.
    pub fn initial_level(&self) -> u32 {
        match self {
            UpgradeKind::Click | UpgradeKind::Multiplier => 1,
            UpgradeKind::Auto => 0,
        }
    }

    /// Exponent applied to `growth()` at a given level.
    ///
    /// Click and Multiplier grow per level above 1, Auto per level.
    pub fn cost_exponent(&self, level: u32) -> u32 {
        match self {
            UpgradeKind::Click | UpgradeKind::Multiplier => level.saturating_sub(1),
            UpgradeKind::Auto => level,
        }
    }

    /// Persisted key of this kind.
    pub fn save_key(&self) -> &'static str {
        match self {
            UpgradeKind::Click => "click",
            UpgradeKind::Auto => "auto",
            UpgradeKind::Multiplier => "multiplier",
        }
    }
}

/// One upgrade line. The cost is always derived from the level.
#[derive(Clone, Debug, PartialEq)]
pub struct Upgrade {
    pub kind: UpgradeKind,
    pub level: u32,
}

impl Upgrade {
    pub fn new(kind: UpgradeKind) -> Self {
        Self {
            kind,
            level: kind.initial_level(),
        }
    }

    /// Current cost of the next purchase, in satoshis.
    pub fn cost(&self) -> f64 {
        let exp = self.kind.cost_exponent(self.level).min(i32::MAX as u32) as i32;
        self.kind.base_cost() * self.kind.growth().powi(exp)
    }
}

/// Balance milestones. Ordered by threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AchievementId {
    FirstBitcoin,
    CryptoEnthusiast,
    BitcoinMillionaire,
}

impl AchievementId {
    pub fn name(&self) -> &'static str {
        match self {
            AchievementId::FirstBitcoin => "First Bitcoin",
            AchievementId::CryptoEnthusiast => "Crypto Enthusiast",
            AchievementId::BitcoinMillionaire => "Bitcoin Millionaire",
        }
    }

    pub fn medal(&self) -> &'static str {
        match self {
            AchievementId::FirstBitcoin => "🥉",
            AchievementId::CryptoEnthusiast => "🥈",
            AchievementId::BitcoinMillionaire => "🥇",
        }
    }

    /// Persisted identifier.
    pub fn key(&self) -> &'static str {
        match self {
            AchievementId::FirstBitcoin => "firstBitcoin",
            AchievementId::CryptoEnthusiast => "cryptoEnthusiast",
            AchievementId::BitcoinMillionaire => "bitcoinMillionaire",
        }
    }

    pub fn from_key(key: &str) -> Option<AchievementId> {
        ACHIEVEMENTS
            .iter()
            .map(|a| a.id)
            .find(|id| id.key() == key)
    }
}

/// A fixed `(id, threshold)` pair.
#[derive(Clone, Copy, Debug)]
pub struct Achievement {
    pub id: AchievementId,
    /// Balance (in satoshis) at which it unlocks.
    pub threshold: f64,
}

/// Evaluated independently, so several can unlock in one pass.
pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: AchievementId::FirstBitcoin,
        threshold: 100.0,
    },
    Achievement {
        id: AchievementId::CryptoEnthusiast,
        threshold: 10_000.0,
    },
    Achievement {
        id: AchievementId::BitcoinMillionaire,
        threshold: 1_000_000.0,
    },
];

/// Persisted part of a Bitcoin Tap game.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    /// Current balance, never negative.
    pub balance: f64,
    /// Earned per unmodified tap.
    pub base_per_tap: f64,
    /// Passive income per second, before the multiplier.
    pub per_second: f64,
    /// Global income factor, starts at 1 and only grows.
    pub multiplier: u64,
    /// One entry per `UpgradeKind::all()`, same order.
    pub upgrades: Vec<Upgrade>,
    /// Unlocked achievements.
    pub achievements: BTreeSet<AchievementId>,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            balance: 0.0,
            base_per_tap: DEFAULT_PER_TAP,
            per_second: 0.0,
            multiplier: 1,
            upgrades: UpgradeKind::all().iter().map(|k| Upgrade::new(*k)).collect(),
            achievements: BTreeSet::new(),
        }
    }

    pub fn upgrade(&self, kind: UpgradeKind) -> &Upgrade {
        &self.upgrades[kind.index()]
    }

    pub fn upgrade_mut(&mut self, kind: UpgradeKind) -> &mut Upgrade {
        &mut self.upgrades[kind.index()]
    }

    /// Effective earnings of one tap without combo bonus.
    pub fn effective_per_tap(&self) -> f64 {
        self.base_per_tap * self.multiplier as f64
    }

    /// Effective passive income per second.
    pub fn effective_per_second(&self) -> f64 {
        self.per_second * self.multiplier as f64
    }

    pub fn can_afford(&self, kind: UpgradeKind) -> bool {
        self.balance >= self.upgrade(kind).cost()
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.achievements.contains(&id)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
