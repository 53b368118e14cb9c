//! Item keys consumed by affix eligibility and weighting.
//!
//! The item/equipment layer owns items themselves; this crate only needs
//! their type, slot and rarity as opaque keys.

/// Base item type an affix may be restricted to.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemType {
    Sword,
    Axe,
    Mace,
    Dagger,
    Bow,
    Staff,
    Wand,
    Shield,
    Helmet,
    BodyArmor,
    Gloves,
    Boots,
    Belt,
    Ring,
    Amulet,
}

impl ItemType {
    /// Returns true for item types that deal damage.
    pub const fn is_weapon(&self) -> bool {
        matches!(
            self,
            Self::Sword | Self::Axe | Self::Mace | Self::Dagger | Self::Bow | Self::Staff | Self::Wand
        )
    }

    /// Returns true for item types that occupy an armour slot.
    pub const fn is_armor(&self) -> bool {
        matches!(
            self,
            Self::Shield | Self::Helmet | Self::BodyArmor | Self::Gloves | Self::Boots | Self::Belt
        )
    }

    /// Returns true for rings and amulets.
    pub const fn is_jewellery(&self) -> bool {
        matches!(self, Self::Ring | Self::Amulet)
    }

    /// Equipment slot an item of this type is worn in.
    pub const fn default_slot(&self) -> ItemSlot {
        match self {
            Self::Sword | Self::Axe | Self::Mace | Self::Dagger | Self::Bow | Self::Staff => {
                ItemSlot::MainHand
            }
            Self::Wand | Self::Shield => ItemSlot::OffHand,
            Self::Helmet => ItemSlot::Head,
            Self::BodyArmor => ItemSlot::Chest,
            Self::Gloves => ItemSlot::Hands,
            Self::Boots => ItemSlot::Feet,
            Self::Belt => ItemSlot::Waist,
            Self::Ring => ItemSlot::Finger,
            Self::Amulet => ItemSlot::Neck,
        }
    }
}

/// Equipment slot an item is placed in.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemSlot {
    MainHand,
    OffHand,
    Head,
    Chest,
    Hands,
    Feet,
    Waist,
    Finger,
    Neck,
}

/// Item rarity tier.
///
/// Rarity biases affix weighting towards higher ranks and selects the default
/// prefix/suffix count presets.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemRarity {
    #[default]
    Normal,
    Magic,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl ItemRarity {
    /// Numeric tier (0 for Normal through 5 for Mythic).
    pub const fn tier(&self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Magic => 1,
            Self::Rare => 2,
            Self::Epic => 3,
            Self::Legendary => 4,
            Self::Mythic => 5,
        }
    }

    /// Inverse of [`ItemRarity::tier`]; tiers above 5 saturate at Mythic.
    pub const fn from_tier(tier: u8) -> Self {
        match tier {
            0 => Self::Normal,
            1 => Self::Magic,
            2 => Self::Rare,
            3 => Self::Epic,
            4 => Self::Legendary,
            _ => Self::Mythic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn rarity_tier_round_trips() {
        for rarity in ItemRarity::iter() {
            assert_eq!(ItemRarity::from_tier(rarity.tier()), rarity);
        }
        assert_eq!(ItemRarity::from_tier(42), ItemRarity::Mythic);
    }

    #[test]
    fn item_type_parses_snake_case() {
        assert_eq!("body_armor".parse::<ItemType>().unwrap(), ItemType::BodyArmor);
        assert_eq!("RING".parse::<ItemType>().unwrap(), ItemType::Ring);
        assert_eq!(ItemType::BodyArmor.to_string(), "body_armor");
    }

    #[test]
    fn every_item_type_has_exactly_one_family() {
        for item_type in ItemType::iter() {
            let families = [
                item_type.is_weapon(),
                item_type.is_armor(),
                item_type.is_jewellery(),
            ];
            assert_eq!(families.iter().filter(|f| **f).count(), 1, "{item_type}");
        }
    }
}
