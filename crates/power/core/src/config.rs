//! Tunable parameters for affix weighting and generation.

use crate::item::ItemRarity;

/// Top-level configuration, typically loaded from `config.toml`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PowerConfig {
    pub weighting: WeightingConfig,
    pub generator: GeneratorConfig,
}

/// Constants of the effective-weight formula.
///
/// ```text
/// rarity_factor = rarity_base + rarity × rarity_step
/// rank_norm     = (rank - 1) / 99
/// adjustment    = rarity_factor ^ (rank_norm × rank_exponent_scale)
/// ilvl_bonus    = 1                                          if ilvl ≤ level_threshold
///               = 1 + (ilvl - level_threshold) / level_divisor otherwise
/// weight        = max(min_weight, floor(base_weight × adjustment × ilvl_bonus))
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct WeightingConfig {
    pub rarity_base: f64,
    pub rarity_step: f64,
    pub rank_exponent_scale: f64,
    pub level_threshold: u32,
    pub level_divisor: f64,
    pub min_weight: u64,
}

impl WeightingConfig {
    pub const DEFAULT_RARITY_BASE: f64 = 0.5;
    pub const DEFAULT_RARITY_STEP: f64 = 0.3;
    pub const DEFAULT_RANK_EXPONENT_SCALE: f64 = 2.0;
    pub const DEFAULT_LEVEL_THRESHOLD: u32 = 50;
    pub const DEFAULT_LEVEL_DIVISOR: f64 = 200.0;
    pub const DEFAULT_MIN_WEIGHT: u64 = 1;

    pub const fn new() -> Self {
        Self {
            rarity_base: Self::DEFAULT_RARITY_BASE,
            rarity_step: Self::DEFAULT_RARITY_STEP,
            rank_exponent_scale: Self::DEFAULT_RANK_EXPONENT_SCALE,
            level_threshold: Self::DEFAULT_LEVEL_THRESHOLD,
            level_divisor: Self::DEFAULT_LEVEL_DIVISOR,
            min_weight: Self::DEFAULT_MIN_WEIGHT,
        }
    }
}

impl Default for WeightingConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Inclusive count range, drawn uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub const fn exactly(count: u32) -> Self {
        Self::new(count, count)
    }

    /// Draw a count in `[min, max]`. An inverted range yields `min`.
    pub fn roll<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

/// Per-item placement limits enforced by an affix set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct AffixLimits {
    pub max_prefixes: u32,
    pub max_suffixes: u32,
    pub min_prefixes: u32,
    pub min_suffixes: u32,
}

impl AffixLimits {
    pub const DEFAULT_MAX_PREFIXES: u32 = 3;
    pub const DEFAULT_MAX_SUFFIXES: u32 = 3;

    pub const fn new(max_prefixes: u32, max_suffixes: u32) -> Self {
        Self {
            max_prefixes,
            max_suffixes,
            min_prefixes: 0,
            min_suffixes: 0,
        }
    }

    #[must_use]
    pub const fn with_minimums(mut self, min_prefixes: u32, min_suffixes: u32) -> Self {
        self.min_prefixes = min_prefixes;
        self.min_suffixes = min_suffixes;
        self
    }
}

impl Default for AffixLimits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_PREFIXES, Self::DEFAULT_MAX_SUFFIXES)
    }
}

/// Prefix/suffix counts drawn by full-item generation, plus the limits of
/// the sets it produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GeneratorConfig {
    pub prefixes: CountRange,
    pub suffixes: CountRange,
    pub limits: AffixLimits,
}

impl GeneratorConfig {
    /// Count presets per rarity.
    ///
    /// | Rarity    | Prefixes | Suffixes | Caps |
    /// |-----------|----------|----------|------|
    /// | Normal    | 0        | 0        | 0/0  |
    /// | Magic     | 0-1      | 0-1      | 1/1  |
    /// | Rare      | 1-3      | 1-3      | 3/3  |
    /// | Epic      | 2-3      | 2-3      | 3/3  |
    /// | Legendary | 3        | 3        | 3/3  |
    /// | Mythic    | 3        | 3        | 3/3  |
    pub const fn for_rarity(rarity: ItemRarity) -> Self {
        let (prefixes, suffixes, limits) = match rarity {
            ItemRarity::Normal => (
                CountRange::exactly(0),
                CountRange::exactly(0),
                AffixLimits::new(0, 0),
            ),
            ItemRarity::Magic => (
                CountRange::new(0, 1),
                CountRange::new(0, 1),
                AffixLimits::new(1, 1),
            ),
            ItemRarity::Rare => (
                CountRange::new(1, 3),
                CountRange::new(1, 3),
                AffixLimits::new(3, 3).with_minimums(1, 1),
            ),
            ItemRarity::Epic => (
                CountRange::new(2, 3),
                CountRange::new(2, 3),
                AffixLimits::new(3, 3).with_minimums(2, 2),
            ),
            ItemRarity::Legendary | ItemRarity::Mythic => (
                CountRange::exactly(3),
                CountRange::exactly(3),
                AffixLimits::new(3, 3).with_minimums(3, 3),
            ),
        };
        Self {
            prefixes,
            suffixes,
            limits,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::for_rarity(ItemRarity::Rare)
    }
}
