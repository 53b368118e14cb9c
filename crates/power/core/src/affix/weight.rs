//! Effective selection weight of an affix in a roll context.
//!
//! Higher item rarity shifts probability mass toward high-rank affixes and
//! item levels past the threshold give every candidate a gentle boost. See
//! [`WeightingConfig`] for the formula.

use super::template::AffixTemplate;
use crate::config::WeightingConfig;
use crate::item::ItemRarity;

/// Effective weight of `template` for an item of `rarity` and `item_level`.
pub fn effective_weight(
    template: &AffixTemplate,
    rarity: ItemRarity,
    item_level: u32,
    config: &WeightingConfig,
) -> u64 {
    let rarity_factor = config.rarity_base + f64::from(rarity.tier()) * config.rarity_step;

    let rank = template
        .rank
        .clamp(AffixTemplate::MIN_RANK, AffixTemplate::MAX_RANK);
    let rank_norm = f64::from(rank - 1) / f64::from(AffixTemplate::MAX_RANK - 1);
    let adjustment = rarity_factor.powf(rank_norm * config.rank_exponent_scale);

    let ilvl_bonus = if item_level <= config.level_threshold {
        1.0
    } else {
        1.0 + f64::from(item_level - config.level_threshold) / config.level_divisor
    };

    let raw = (f64::from(template.weight) * adjustment * ilvl_bonus).floor();
    // NaN and negative products (nonsensical config) collapse to zero before the floor clamp.
    let weight = if raw.is_finite() && raw > 0.0 {
        raw as u64
    } else {
        0
    };
    weight.max(config.min_weight)
}
